use sqlx::PgExecutor;

use crate::{Result, models::StoredDocument};

pub async fn get_document<'e, E>(executor: E, doc_id: &str) -> Result<Option<StoredDocument>>
where
	E: PgExecutor<'e>,
{
	let row = sqlx::query_as::<_, StoredDocument>(
		"\
SELECT
\tdoc_id,
\tsource,
\tcontent,
\tCOALESCE(metadata, '{}'::jsonb) AS metadata,
\tcreated_at,
\tupdated_at
FROM documents
WHERE doc_id = $1
LIMIT 1",
	)
	.bind(doc_id)
	.fetch_optional(executor)
	.await?;

	Ok(row)
}

pub async fn upsert_document<'e, E>(executor: E, doc: &StoredDocument) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query(
		"\
INSERT INTO documents (
\tdoc_id,
\tsource,
\tcontent,
\tmetadata,
\tcreated_at,
\tupdated_at
)
VALUES ($1,$2,$3,$4,$5,$6)
ON CONFLICT (doc_id)
DO UPDATE
SET
\tsource = EXCLUDED.source,
\tcontent = EXCLUDED.content,
\tmetadata = EXCLUDED.metadata,
\tupdated_at = EXCLUDED.updated_at",
	)
	.bind(doc.doc_id.as_str())
	.bind(doc.source.as_str())
	.bind(doc.content.as_str())
	.bind(&doc.metadata)
	.bind(doc.created_at)
	.bind(doc.updated_at)
	.execute(executor)
	.await?;

	Ok(())
}
