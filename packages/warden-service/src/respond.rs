use tracing::warn;

use warden_config::GenerationProviderConfig;
use warden_domain::GroundedPassage;

use crate::GenerationProvider;

/// Fixed response when no authorized context exists. Returned without
/// calling the generation service.
pub const NO_CONTEXT_ANSWER: &str =
	"I don't have access to any relevant information to answer your question.";

/// Fixed response when the generation service fails mid-query.
pub const GENERATION_FAILURE_ANSWER: &str =
	"Sorry, I encountered an error while generating the response.";

const SYSTEM_PROMPT: &str = "You are a helpful assistant with access to authorized documents. \
	Only use the information provided in the context to answer questions. \
	If the context doesn't contain enough information to answer the question, \
	say so clearly. Do not make up information.";

/// Produces the answer text for a query from its admitted passages. The
/// passages are the only material handed to the model; their relevance order
/// is preserved in the context block.
pub async fn answer(
	generation: &dyn GenerationProvider,
	cfg: &GenerationProviderConfig,
	query: &str,
	passages: &[GroundedPassage],
) -> String {
	if passages.is_empty() {
		return NO_CONTEXT_ANSWER.to_string();
	}

	let user = build_user_prompt(query, passages);

	match generation.generate(cfg, SYSTEM_PROMPT, &user).await {
		Ok(text) => text,
		Err(err) => {
			warn!(error = %err, "Generation failed; returning the fixed apology.");

			GENERATION_FAILURE_ANSWER.to_string()
		},
	}
}

fn build_user_prompt(query: &str, passages: &[GroundedPassage]) -> String {
	let context =
		passages.iter().map(|passage| passage.text.as_str()).collect::<Vec<_>>().join("\n\n");

	format!("Context:\n{context}\n\nQuestion: {query}\n\nAnswer:")
}
