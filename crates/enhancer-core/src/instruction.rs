//! Fixed instruction sent to the remote completion service.

use crate::types::EnhancementRequest;

/// Behavioral contract for the remote model. Invariant across requests.
pub const SYSTEM_INSTRUCTION: &str = "You are a Prompt Enhancement Engine. Transform vague inputs into highly structured, executable prompts for AI agents.

Output format (MUST follow exactly):

# CONTEXTO
[Background and context]

# PAPEL DO AGENTE
[Detailed role description]

# OBJETIVO
[Clear, measurable objective]

# ESCOPO
Inclui: [list]
Não inclui: [list]

# RESTRIÇÕES
[Clear limitations]

# FORMATO DE SAÍDA
[Expected output format]

# CRITÉRIOS DE QUALIDADE
[Measurable success criteria]

# PASSOS DE EXECUÇÃO
1. [Step]
2. [Step]
3. [Step]

# EDGE CASES
[How to handle edge cases]";

/// Build the user turn from the labeled input and mode fields.
pub fn build_user_message(request: &EnhancementRequest) -> String {
    format!(
        "Input original: {}\n\nModo: {}\n\nGere o prompt estruturado seguindo o formato definido.",
        request.input(),
        request.mode()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_labels_input_and_mode() {
        let request = EnhancementRequest::new("create a landing page", Some("marketing")).unwrap();
        assert_eq!(
            build_user_message(&request),
            "Input original: create a landing page\n\nModo: marketing\n\nGere o prompt estruturado seguindo o formato definido."
        );
    }

    #[test]
    fn system_instruction_lists_every_section() {
        for header in crate::template::SECTION_HEADERS {
            assert!(
                SYSTEM_INSTRUCTION.contains(&format!("# {header}\n")),
                "missing {header}"
            );
        }
    }
}
