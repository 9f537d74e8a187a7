use async_trait::async_trait;

use crate::domain::{Backend, Category, ClassificationRequest, ClassificationResult};

use super::{Classifier, TierOutcome};

pub const ACTIONABLE_THRESHOLD: i32 = 3;
pub const SHORT_EMAIL_CHARS: usize = 50;
pub const SHORT_EMAIL_PENALTY: i32 = -2;
pub const HEADER_BONUS: i32 = 1;

const ACTIONABLE_KEYWORDS: &[(&str, i32)] = &[
    ("reuni", 3),
    ("cronograma", 3),
    ("prazo", 3),
    ("entrega", 3),
    ("alinhamento", 3),
    ("orçamento", 3),
    ("proposta", 3),
    ("contrato", 3),
    ("briefing", 3),
    ("escopo", 3),
    ("documenta", 2),
    ("status", 2),
    ("retorno", 2),
    ("agenda", 2),
    ("projeto", 3),
    ("cliente", 2),
    ("empresa", 2),
    ("trabalho", 2),
    ("colaboração", 2),
    ("parceria", 2),
    ("desenvolvimento", 2),
    ("implementação", 2),
    ("apresentação", 2),
    ("relatório", 2),
];

const NON_ACTIONABLE_KEYWORDS: &[(&str, i32)] = &[
    ("spam", -3),
    ("oferta", -2),
    ("ganhe", -3),
    ("promo", -2),
    ("desconto", -2),
    ("sorteio", -3),
    ("bitcoin", -2),
    ("cripto", -2),
    ("investimento", -1),
    ("marketing", -1),
    ("vendas", -1),
    ("propaganda", -2),
    ("anúncio", -2),
];

// subject, to, from, date, time, location
const HEADER_MARKERS: &[&str] = &["assunto:", "para:", "de:", "data:", "horário:", "local:"];

const ACTIONABLE_REPLY: &str = "Olá, obrigado pelo contato. Podemos agendar uma reunião para alinhar os próximos passos? \
Envie, por favor, sua disponibilidade e eventuais materiais relevantes.";
const NON_ACTIONABLE_REPLY: &str = "Olá, obrigado pela mensagem. No momento, não temos interesse. Caso deseje, mantenha-nos \
informados sobre novidades mais alinhadas às nossas necessidades.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeuristicScore {
    pub score: i32,
    pub actionable_hits: Vec<&'static str>,
    pub non_actionable_hits: Vec<&'static str>,
    pub short_penalty: bool,
    pub header_bonus: bool,
}

impl HeuristicScore {
    pub fn compute(original: &str, normalized: &str) -> Self {
        let actionable_hits = matches(ACTIONABLE_KEYWORDS, normalized);
        let non_actionable_hits = matches(NON_ACTIONABLE_KEYWORDS, normalized);

        let mut score: i32 = ACTIONABLE_KEYWORDS
            .iter()
            .chain(NON_ACTIONABLE_KEYWORDS)
            .filter(|(keyword, _)| normalized.contains(keyword))
            .map(|(_, weight)| weight)
            .sum();

        let short_penalty = original.trim().chars().count() < SHORT_EMAIL_CHARS;
        if short_penalty {
            score += SHORT_EMAIL_PENALTY;
        }

        let lowered = original.to_lowercase();
        let header_bonus = HEADER_MARKERS.iter().any(|marker| lowered.contains(marker));
        if header_bonus {
            score += HEADER_BONUS;
        }

        Self {
            score,
            actionable_hits,
            non_actionable_hits,
            short_penalty,
            header_bonus,
        }
    }

    pub fn category(&self) -> Category {
        if self.score >= ACTIONABLE_THRESHOLD {
            Category::Actionable
        } else {
            Category::NonActionable
        }
    }
}

fn matches(table: &'static [(&'static str, i32)], normalized: &str) -> Vec<&'static str> {
    table
        .iter()
        .filter(|(keyword, _)| normalized.contains(keyword))
        .map(|(keyword, _)| *keyword)
        .collect()
}

fn top_keywords(hits: &[&'static str]) -> String {
    hits.iter().take(3).copied().collect::<Vec<_>>().join(", ")
}

/// Keyword scoring with no I/O. Terminal tier of the cascade.
pub fn classify_heuristic(original: &str, normalized: &str) -> ClassificationResult {
    let scored = HeuristicScore::compute(original, normalized);
    let category = scored.category();

    let (reason, suggested_reply) = match category {
        Category::Actionable => {
            let keywords = top_keywords(&scored.actionable_hits);
            (
                format!("Score: {}. Keywords found: {keywords}", scored.score),
                ACTIONABLE_REPLY,
            )
        }
        Category::NonActionable => {
            let mut reason = format!(
                "Score: {}. Not enough professional context.",
                scored.score
            );
            if !scored.non_actionable_hits.is_empty() {
                let keywords = top_keywords(&scored.non_actionable_hits);
                reason.push_str(&format!(" Non-actionable keywords: {keywords}"));
            } else if !scored.actionable_hits.is_empty() {
                let keywords = top_keywords(&scored.actionable_hits);
                reason.push_str(&format!(" Professional keywords below threshold: {keywords}"));
            }
            (reason, NON_ACTIONABLE_REPLY)
        }
    };

    tracing::debug!(
        target: "classifier",
        score = scored.score,
        short_penalty = scored.short_penalty,
        header_bonus = scored.header_bonus,
        %category,
        "heuristic scored"
    );

    ClassificationResult {
        category,
        reason,
        suggested_reply: suggested_reply.to_string(),
        classified_by: Backend::Heuristic,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicClassifier;

#[async_trait]
impl Classifier for HeuristicClassifier {
    fn tier(&self) -> Backend {
        Backend::Heuristic
    }

    async fn classify(&self, request: &ClassificationRequest) -> TierOutcome {
        TierOutcome::Classified(self.verdict(request))
    }
}

impl HeuristicClassifier {
    pub fn verdict(&self, request: &ClassificationRequest) -> ClassificationResult {
        classify_heuristic(&request.original_text, &request.normalized_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::normalizer::Normalizer;

    fn run(text: &str) -> (HeuristicScore, ClassificationResult) {
        let normalized = Normalizer::default().normalize(text);
        (
            HeuristicScore::compute(text, &normalized),
            classify_heuristic(text, &normalized),
        )
    }

    #[test]
    fn short_email_reason_names_the_outweighed_keywords() {
        let (score, result) = run("Segue o projeto revisado, abraços.");
        assert_eq!(score.score, 1);
        assert!(score.short_penalty);
        assert_eq!(result.category, Category::NonActionable);
        assert_eq!(
            result.reason,
            "Score: 1. Not enough professional context. Professional keywords below threshold: projeto"
        );
    }

    #[test]
    fn promotional_blast_is_non_actionable() {
        let (score, result) = run("Promoção especial! Desconto de 50%!");
        assert_eq!(score.score, -6);
        assert!(score.short_penalty);
        assert_eq!(result.category, Category::NonActionable);
        assert!(result.reason.contains("Score: -6"));
        assert!(result.reason.contains("promo"));
    }

    #[test]
    fn meeting_about_project_schedule_is_actionable() {
        let text = "Bom dia, equipe! Gostaria de marcar uma reunião para revisar o cronograma do projeto na próxima semana.";
        assert!(text.chars().count() >= 80);
        let (score, result) = run(text);
        assert!(score.score >= ACTIONABLE_THRESHOLD);
        assert_eq!(result.category, Category::Actionable);
        assert!(result.reason.contains("reuni, cronograma, projeto"));
    }

    #[test]
    fn score_of_exactly_three_is_actionable() {
        let text = "Segue em anexo o projeto revisado conforme conversamos ontem a tarde.";
        let (score, result) = run(text);
        assert_eq!(score.actionable_hits, vec!["projeto"]);
        assert!(!score.short_penalty);
        assert!(!score.header_bonus);
        assert_eq!(score.score, 3);
        assert_eq!(result.category, Category::Actionable);
    }

    #[test]
    fn score_of_two_is_non_actionable() {
        let text = "Segue em anexo o relatório revisado conforme conversamos ontem a tarde.";
        let (score, result) = run(text);
        assert_eq!(score.score, 2);
        assert_eq!(result.category, Category::NonActionable);
    }

    #[test]
    fn short_emails_lose_exactly_two_points() {
        let short = "Segue o projeto revisado, abraços.";
        let padded = "Segue o projeto revisado, abraços. Qualquer dúvida estou à disposição sempre.";
        assert!(short.chars().count() < 50);
        assert!(padded.chars().count() >= 60);
        let (short_score, _) = run(short);
        let (padded_score, _) = run(padded);
        assert_eq!(short_score.actionable_hits, padded_score.actionable_hits);
        assert_eq!(padded_score.score - short_score.score, 2);
    }

    #[test]
    fn header_markers_add_one_point() {
        let text = "Assunto: relatório semanal\nSegue o relatório com os números da semana passada.";
        let (score, result) = run(text);
        assert!(score.header_bonus);
        assert_eq!(score.score, 3);
        assert_eq!(result.category, Category::Actionable);
    }

    #[test]
    fn repeated_keywords_count_once() {
        let text = "projeto projeto projeto projeto projeto projeto projeto projeto projeto";
        let (score, _) = run(text);
        assert_eq!(score.score, 3);
    }

    #[test]
    fn degenerate_inputs_still_produce_a_full_result() {
        for text in ["", "   ", "!!!", "1234567890", "🙂🙂🙂", "\u{0}\u{1}"] {
            let result = classify_heuristic(text, &Normalizer::default().normalize(text));
            assert_eq!(result.category, Category::NonActionable);
            assert!(!result.reason.is_empty());
            assert!(!result.suggested_reply.is_empty());
            assert_eq!(result.classified_by, Backend::Heuristic);
        }
    }

    #[tokio::test]
    async fn classifier_trait_always_classifies() {
        let request =
            ClassificationRequest::new("ganhe um sorteio agora", &Normalizer::default()).unwrap();
        match HeuristicClassifier.classify(&request).await {
            TierOutcome::Classified(result) => {
                assert_eq!(result.category, Category::NonActionable)
            }
            TierOutcome::Deferred(reason) => panic!("heuristic deferred: {reason}"),
        }
    }
}
