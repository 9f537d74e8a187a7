//! Template replies for the local-model tier.

use super::local_model::{FINANCIAL_SCAM_KEYWORDS, PROMOTIONAL_KEYWORDS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    StrongBusiness,
    ModerateBusiness,
    LightBusiness,
    Spam,
    Generic,
    Unclear,
}

impl ResponseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseKind::StrongBusiness => "strong-business",
            ResponseKind::ModerateBusiness => "moderate-business",
            ResponseKind::LightBusiness => "light-business",
            ResponseKind::Spam => "spam",
            ResponseKind::Generic => "generic",
            ResponseKind::Unclear => "unclear",
        }
    }
}

const URGENCY_MARKERS: &[&str] = &["urgente", "rápido", "hoje", "amanhã", "prazo"];
const FIRST_CONTACT_MARKERS: &[&str] = &["primeira vez", "conheci", "indicação", "recomendação"];

/// Picks a reply from the fixed template table.
///
/// `signals` holds business category names for the business kinds and the
/// matched spam keywords for [`ResponseKind::Spam`].
pub fn generate_reply(kind: ResponseKind, original: &str, signals: &[String]) -> String {
    let lowered = original.to_lowercase();
    let has_signal = |name: &str| signals.iter().any(|signal| signal == name);

    let reply = match kind {
        ResponseKind::StrongBusiness => {
            if has_signal("meetings") {
                if mentions_any(&lowered, URGENCY_MARKERS) {
                    "Olá! Vejo que há urgência para a reunião. Posso disponibilizar um horário ainda hoje ou amanhã. Qual seria o melhor período para você?"
                } else {
                    "Olá! Fico feliz em agendar uma reunião. Tenho disponibilidade na próxima semana. Poderia me enviar alguns horários que funcionam para você?"
                }
            } else if has_signal("projects") {
                "Olá! Obrigado pelo interesse no projeto. Vou analisar os detalhes e preparar uma proposta inicial. Podemos agendar uma conversa para alinhar expectativas e cronograma?"
            } else if has_signal("business") {
                "Olá! Recebi sua solicitação comercial. Vou revisar os detalhes e retornar com feedback em breve. Caso tenha documentação adicional, fique à vontade para enviar."
            } else {
                "Olá! Obrigado pelo contato profissional. Vou analisar sua mensagem e retornar com uma resposta detalhada em breve."
            }
        }
        ResponseKind::ModerateBusiness => {
            if mentions_any(&lowered, FIRST_CONTACT_MARKERS) {
                "Olá! Obrigado pelo primeiro contato. Vou analisar sua proposta e retornar em breve. Caso tenha materiais complementares, pode enviar."
            } else {
                "Olá! Recebi sua mensagem e vou analisar os pontos mencionados. Retorno em breve com mais informações."
            }
        }
        ResponseKind::LightBusiness => {
            "Olá! Obrigado pelo contato. Vou verificar internamente e retornar com uma posição. Aguarde meu retorno."
        }
        ResponseKind::Spam => {
            if signals.iter().any(|s| FINANCIAL_SCAM_KEYWORDS.contains(&s.as_str())) {
                "Obrigado pelo contato, mas não temos interesse em investimentos ou criptomoedas no momento."
            } else if signals.iter().any(|s| PROMOTIONAL_KEYWORDS.contains(&s.as_str())) {
                "Obrigado pela oferta, mas no momento não temos interesse em serviços promocionais."
            } else {
                "Obrigado pelo contato, mas no momento não temos interesse neste tipo de proposta."
            }
        }
        ResponseKind::Generic => {
            "Olá! Obrigado pela mensagem. Para melhor atendê-lo, poderia ser mais específico sobre o assunto de interesse?"
        }
        ResponseKind::Unclear => {
            "Olá! Obrigado pelo contato. No momento não conseguimos identificar como podemos ajudar. Caso tenha uma solicitação específica, fique à vontade para detalhar."
        }
    };
    reply.to_string()
}

fn mentions_any(lowered: &str, markers: &[&str]) -> bool {
    markers.iter().any(|marker| lowered.contains(marker))
}
