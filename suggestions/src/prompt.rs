//! Prompt construction and response parsing.

use crate::error::{GeneratorError, Result};
use crate::types::{SuggestionRequest, SuggestionSet};

/// System message for chat models.
pub const SYSTEM_PROMPT: &str = "You help a deaf or non-verbal person reply in live \
conversation. Answer only with a JSON object with the string fields \"casual\", \
\"formal\" and \"quick\".";

/// Build the user prompt for `request`.
pub fn build_prompt(request: &SuggestionRequest) -> String {
    let mut prompt = String::from(
        "The user is deaf or non-verbal and using this app to communicate.\n",
    );
    prompt.push_str(&format!(
        "The conversation partner just said: \"{}\"\n",
        request.text.trim()
    ));
    if let Some(label) = &request.context_label {
        prompt.push_str(&format!("The conversation is taking place in this setting: {label}.\n"));
    }
    prompt.push_str(
        "\nGenerate 3 likely replies for the user to choose from:\n\
         - casual: a short, casual, and friendly reply\n\
         - formal: a polite, professional, and formal reply\n\
         - quick: a very brief, one-word acknowledgment\n",
    );
    prompt
}

/// Parse a model answer into a [`SuggestionSet`].
///
/// Accepts a bare JSON object or one wrapped in a Markdown code fence. All
/// three replies must be non-blank.
pub fn parse_suggestions(content: &str) -> Result<SuggestionSet> {
    let json = strip_code_fence(content.trim());
    let set: SuggestionSet = serde_json::from_str(json)
        .map_err(|e| GeneratorError::InvalidResponse(format!("not a suggestion set: {e}")))?;

    if let Some((tone, _)) = set.iter().find(|(_, reply)| reply.trim().is_empty()) {
        return Err(GeneratorError::InvalidResponse(format!(
            "empty {tone} suggestion"
        )));
    }

    Ok(SuggestionSet::new(
        set.casual.trim(),
        set.formal.trim(),
        set.quick.trim(),
    ))
}

fn strip_code_fence(content: &str) -> &str {
    let Some(rest) = content.strip_prefix("```") else {
        return content;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
