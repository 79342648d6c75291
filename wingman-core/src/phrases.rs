use std::time::{SystemTime, UNIX_EPOCH};

/// Stock interview questions used when every transcription strategy has
/// failed, so the rest of the pipeline still gets exercised. Callers tag the
/// result as synthetic; the text itself carries no marker.
pub const SIMULATED_QUESTIONS: &[&str] = &[
    "Onde você se vê em 5 anos?",
    "Me conte sobre sua experiência profissional.",
    "Quais são suas principais habilidades técnicas?",
    "Como você lidaria com um conflito na equipe?",
    "Descreva um projeto desafiador que você trabalhou.",
    "Qual é o seu conhecimento em React e Node.js?",
    "Você tem experiência com metodologias ágeis?",
    "Como você mantém-se atualizado com as novas tecnologias?",
    "Qual foi seu maior desafio técnico e como você o superou?",
    "Você prefere trabalhar sozinho ou em equipe?",
];

/// Canned structured answers shown when the completion request fails.
pub const FALLBACK_SUGGESTIONS: &[&str] = &[
    "**Abordagem recomendada:**\n\n- Mencione sua experiência com projetos similares\n- Destaque resultados quantificáveis\n- Relacione suas habilidades com as necessidades da empresa",
    "**Pontos a destacar:**\n\n1. Sua experiência prévia nesta área\n2. Como você superou desafios similares\n3. Habilidades técnicas relevantes para a função",
    "**Resposta estruturada:**\n\n- **Contexto**: Relacione sua formação com a pergunta\n- **Experiência**: Cite exemplos concretos\n- **Resultados**: Demonstre o impacto do seu trabalho\n- **Aplicação**: Como isso se aplica ao cargo atual",
];

/// Prefix that makes a fallback answer visibly a fallback.
pub const FALLBACK_NOTICE: &str = "**Erro na API, sugestão alternativa:**\n\n";

/// Inline notice shown in place of a suggestion when no API key is set.
pub const NO_API_KEY_NOTICE: &str = "Erro: Chave da API não configurada.";

/// Picks one entry, seeded from the clock's sub-second jitter. Good enough
/// for rotating canned text; not a statistical source.
pub fn pick_seeded<'a>(entries: &[&'a str]) -> &'a str {
    debug_assert!(!entries.is_empty());
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos() as usize)
        .unwrap_or(0);
    entries[seed % entries.len()]
}
