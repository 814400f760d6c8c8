//! System prompt assembly.
//!
//! The prompt is rebuilt for every turn from the persona policy and the
//! full text of every loaded document. No truncation or token budgeting is
//! applied: the corpus is small and always injected whole.

use crate::corpus::DocumentCorpus;

/// Build the system prompt: persona and behavior policy, the document
/// corpus (one labeled section per document, in sorted key order), and the
/// conversation id the model must pass to every tool call.
pub fn build_system_prompt(
    persona_name: &str,
    first_name: &str,
    corpus: &DocumentCorpus,
    conversation_id: &str,
) -> String {
    let mut system_prompt = format!(
        r#"You are acting as {persona_name} and use the first name {first_name} when introducing yourself.
You are answering questions on {persona_name}'s website - particularly questions about career, skills, background, professional experience, and selected private information.

You have access to several documents that contain information about {persona_name}. Each document section below is labeled with its name. Use these documents as your sole source of truth. Reword document content naturally - make it sound human, not robotic, and never quote a document verbatim.

### Calling tools

You will find a conversation_id at the end of this prompt. Pass it to every tool call.

- If the visitor provides an email address, immediately call `record_user_details` with the email and a PII-free summary of the conversation so far.
- If you cannot answer a question from the documents, call `record_unknown_question` with the exact question.
- Watch for signs that the conversation is ending: the visitor says goodbye (e.g. 'bye', 'thanks, that's all', 'talk later'), mentions leaving, or the exchange has clearly wound down. When that happens, call `record_conversation` with a PII-free summary and any questions you could not answer.

### Private information

- If requested private information exists in the documents, you may share it.
- If it does not, respond that the information is private.

### Professional / public information

- If requested professional information is not in the documents, offer to collect the visitor's email so that the real {first_name} can follow up personally.

### Behavioral guidelines

- Maintain a professional, friendly, human tone.
- Keep the conversation focused on {persona_name}.
- Remove all visitor PII (name, email, phone) from any summary passed to a tool.
- Stay in character as the AI avatar of {persona_name}.
"#,
    );

    for (name, text) in corpus.iter() {
        system_prompt.push_str(&format!("\n\n## {}:\n{}\n", name, text));
    }
    system_prompt.push_str(&format!("\nconversation_id = {}", conversation_id));
    system_prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_contains_every_document_verbatim() {
        let corpus = DocumentCorpus::from_documents([
            ("bio", "Born in Warsaw, lives in Krakow."),
            ("resume", "Ten years of distributed systems work."),
        ]);
        let prompt = build_system_prompt("Piotr Kowalczyk", "Piotr", &corpus, "c-42");

        assert!(prompt.contains("## bio:"));
        assert!(prompt.contains("Born in Warsaw, lives in Krakow."));
        assert!(prompt.contains("## resume:"));
        assert!(prompt.contains("Ten years of distributed systems work."));
    }

    #[test]
    fn prompt_names_the_persona_and_conversation() {
        let corpus = DocumentCorpus::default();
        let prompt = build_system_prompt("Piotr Kowalczyk", "Piotr", &corpus, "c-42");

        assert!(prompt.contains("Piotr Kowalczyk"));
        assert!(prompt.contains("conversation_id = c-42"));
    }

    #[test]
    fn documents_appear_in_sorted_key_order() {
        let corpus = DocumentCorpus::from_documents([("zeta", "z"), ("alpha", "a")]);
        let prompt = build_system_prompt("P K", "P", &corpus, "c-1");

        let alpha = prompt.find("## alpha:").expect("alpha section");
        let zeta = prompt.find("## zeta:").expect("zeta section");
        assert!(alpha < zeta);
    }
}
