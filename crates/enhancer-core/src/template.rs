//! Deterministic fallback prompt.
//!
//! Used whenever the remote completion path is not configured or fails. The output is a
//! pure function of `(input, mode)`.

/// Canonical section headers, in output order.
pub const SECTION_HEADERS: [&str; 9] = [
    "CONTEXTO",
    "PAPEL DO AGENTE",
    "OBJETIVO",
    "ESCOPO",
    "RESTRIÇÕES",
    "FORMATO DE SAÍDA",
    "CRITÉRIOS DE QUALIDADE",
    "PASSOS DE EXECUÇÃO",
    "EDGE CASES",
];

/// Render the nine-section template for `input` and `mode`.
pub fn generate_template(input: &str, mode: &str) -> String {
    let input = single_line(input);
    let mode = single_line(mode);

    format!(
        "# CONTEXTO
Usuário solicitou: {input}
Modo: {mode}

# PAPEL DO AGENTE
Especialista em {mode} com capacidade de análise e execução de tarefas complexas.

# OBJETIVO
Executar a solicitação do usuário de forma eficiente e otimizada.

# ESCOPO
Inclui: Análise, planejamento, execução
Não inclui: Tarefas fora do escopo original

# RESTRIÇÕES
- Manter o objetivo original
- Não adicionar suposições não solicitadas

# FORMATO DE SAÍDA
Resposta estruturada com explicações

# CRITÉRIOS DE QUALIDADE
- Clareza
- Precisão
- Completeza

# PASSOS DE EXECUÇÃO
1. Analisar a solicitação
2. Identificar requisitos
3. Executar tarefa
4. Validar resultado

# EDGE CASES
- Solicitações ambíguas: pedir esclarecimento"
    )
}

// Echoed user text is folded onto one line so it can never start a header line.
fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
