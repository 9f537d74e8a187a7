use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    ai::{sentiment::LabelScore, SentimentModel},
    domain::{Backend, Category, ClassificationRequest, ClassificationResult},
};

use super::{
    responder::{generate_reply, ResponseKind},
    Classifier, TierOutcome,
};

pub const SENTIMENT_INPUT_CHARS: usize = 512;
pub const SUBSTANTIAL_CHARS: usize = 80;
pub const STRUCTURED_LINES: usize = 3;
pub const POSITIVE_SENTIMENT_THRESHOLD: f64 = 0.4;
const SPAM_WEIGHT: u32 = 2;

const BUSINESS_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "meetings",
        &["reunião", "reuni", "encontro", "call", "videochamada", "zoom", "teams"],
    ),
    (
        "projects",
        &["projeto", "desenvolvimento", "implementação", "sistema", "aplicação", "software"],
    ),
    (
        "business",
        &["proposta", "orçamento", "contrato", "briefing", "escopo", "cronograma", "prazo"],
    ),
    (
        "professional",
        &["empresa", "cliente", "parceria", "colaboração", "trabalho", "serviço"],
    ),
    (
        "communication",
        &["retorno", "feedback", "alinhamento", "status", "atualização", "informações"],
    ),
];

pub const PROMOTIONAL_KEYWORDS: &[&str] = &[
    "oferta", "promoção", "desconto", "grátis", "ganhe", "sorteio", "prêmio",
];
pub const FINANCIAL_SCAM_KEYWORDS: &[&str] = &[
    "bitcoin", "cripto", "investimento", "lucro", "dinheiro fácil", "renda extra",
];
const GENERIC_SALES_KEYWORDS: &[&str] = &["vendas", "marketing", "anúncio", "propaganda", "divulgação"];
const SUSPICIOUS_KEYWORDS: &[&str] = &["clique aqui", "limitado", "exclusivo", "imperdível"];
const SPAM_FAMILIES: &[&[&str]] = &[
    PROMOTIONAL_KEYWORDS,
    FINANCIAL_SCAM_KEYWORDS,
    GENERIC_SALES_KEYWORDS,
    SUSPICIOUS_KEYWORDS,
];

// Urgency is only suspicious without any business context.
const URGENT_KEYWORD: &str = "urgente";

const GREETINGS: &[&str] = &["prezado", "caro", "olá", "bom dia", "boa tarde", "boa noite"];
const GENERIC_PHRASES: &[&str] = &["tudo bem", "como vai", "e aí", "oi", "tchau", "até mais", "falou"];

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SentimentScores {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

impl SentimentScores {
    /// Collapses the 1-5 star label space. `None` when no star label is present.
    pub fn from_labels(labels: &[LabelScore]) -> Option<Self> {
        let mut scores = SentimentScores::default();
        let mut recognized = false;
        for entry in labels {
            let bucket = match entry.label.trim().to_lowercase().as_str() {
                "4 stars" | "5 stars" => &mut scores.positive,
                "1 star" | "2 stars" => &mut scores.negative,
                "3 stars" => &mut scores.neutral,
                _ => continue,
            };
            recognized = true;
            *bucket = bucket.max(entry.score);
        }
        recognized.then_some(scores)
    }
}

/// Keyword tallies and structural cues extracted from one email.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmailSignals {
    pub business_tally: u32,
    pub spam_tally: u32,
    pub business_categories: Vec<String>,
    pub spam_keywords: Vec<String>,
    pub has_greeting: bool,
    pub has_signature: bool,
    pub is_structured: bool,
    pub is_substantial: bool,
    pub generic_phrases: Vec<String>,
    pub length: usize,
}

impl EmailSignals {
    pub fn extract(original: &str, normalized: &str) -> Self {
        let lowered = original.to_lowercase();
        let mut signals = EmailSignals::default();

        for (category, keywords) in BUSINESS_CATEGORIES {
            let seen = keywords
                .iter()
                .any(|keyword| lowered.contains(keyword) || normalized.contains(keyword));
            if seen {
                signals.business_tally += 1;
                signals.business_categories.push((*category).to_string());
            }
        }

        for keyword in SPAM_FAMILIES.iter().flat_map(|family| family.iter()) {
            if lowered.contains(keyword) {
                signals.spam_tally += SPAM_WEIGHT;
                signals.spam_keywords.push((*keyword).to_string());
            }
        }

        if lowered.contains(URGENT_KEYWORD) && signals.business_tally == 0 {
            signals.spam_tally += SPAM_WEIGHT;
            signals.spam_keywords.push(URGENT_KEYWORD.to_string());
        }

        let trimmed = original.trim();
        let lines: Vec<&str> = trimmed.split('\n').collect();
        signals.has_greeting = GREETINGS.iter().any(|greeting| lowered.contains(greeting));
        signals.has_signature =
            lines.len() > 2 && lines[lines.len() - 2..].iter().any(|line| !line.trim().is_empty());
        signals.is_structured = lines.len() >= STRUCTURED_LINES;
        signals.length = trimmed.chars().count();
        signals.is_substantial = signals.length >= SUBSTANTIAL_CHARS;
        signals.generic_phrases = GENERIC_PHRASES
            .iter()
            .filter(|phrase| lowered.contains(*phrase))
            .map(|phrase| (*phrase).to_string())
            .collect();

        signals
    }

    fn categories_label(&self) -> String {
        list_or_none(&self.business_categories)
    }
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

/// Runs the decision ladder over extracted signals and collapsed sentiment.
pub fn decide(signals: &EmailSignals, sentiment: SentimentScores) -> (Category, ResponseKind, String) {
    let business = signals.business_tally;
    let spam = signals.spam_tally;

    if spam >= 2 {
        let keywords = signals
            .spam_keywords
            .iter()
            .take(3)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        return (
            Category::NonActionable,
            ResponseKind::Spam,
            format!("Spam or promotional signals detected (business: {business}, spam: {spam}). Keywords: {keywords}"),
        );
    }

    if business >= 3 && spam == 0 {
        return (
            Category::Actionable,
            ResponseKind::StrongBusiness,
            format!(
                "Strong professional context (business: {business}, spam: {spam}, categories: {})",
                signals.categories_label()
            ),
        );
    }

    if business >= 2 && signals.is_structured && signals.is_substantial && spam == 0 {
        return (
            Category::Actionable,
            ResponseKind::ModerateBusiness,
            format!(
                "Structured, substantial professional email (business: {business}, spam: {spam}, categories: {})",
                signals.categories_label()
            ),
        );
    }

    if business >= 1
        && sentiment.positive > POSITIVE_SENTIMENT_THRESHOLD
        && spam == 0
        && signals.is_substantial
    {
        return (
            Category::Actionable,
            ResponseKind::LightBusiness,
            format!(
                "Professional context with positive sentiment (business: {business}, spam: {spam}, categories: {}, positive: {:.2})",
                signals.categories_label(),
                sentiment.positive
            ),
        );
    }

    if signals.generic_phrases.len() >= 2 || !signals.is_substantial {
        return (
            Category::NonActionable,
            ResponseKind::Generic,
            format!(
                "Generic or insubstantial email (business: {business}, spam: {spam}, generic phrases: {}, length: {})",
                list_or_none(&signals.generic_phrases),
                signals.length
            ),
        );
    }

    (
        Category::NonActionable,
        ResponseKind::Unclear,
        format!(
            "Not enough professional context (business: {business}, spam: {spam}, categories: {}, positive: {:.2})",
            signals.categories_label(),
            sentiment.positive
        ),
    )
}

pub fn classify_with_sentiment(
    original: &str,
    normalized: &str,
    sentiment: SentimentScores,
) -> ClassificationResult {
    let signals = EmailSignals::extract(original, normalized);
    tracing::debug!(
        target: "classifier",
        business = signals.business_tally,
        spam = signals.spam_tally,
        generic = signals.generic_phrases.len(),
        greeting = signals.has_greeting,
        signature = signals.has_signature,
        positive = sentiment.positive,
        negative = sentiment.negative,
        neutral = sentiment.neutral,
        "local model signals"
    );

    let (category, kind, reason) = decide(&signals, sentiment);
    tracing::debug!(target: "classifier", rung = kind.as_str(), %category, "local model decision");
    let context: &[String] = match kind {
        ResponseKind::Spam => signals.spam_keywords.as_slice(),
        ResponseKind::StrongBusiness | ResponseKind::ModerateBusiness | ResponseKind::LightBusiness => {
            signals.business_categories.as_slice()
        }
        ResponseKind::Generic | ResponseKind::Unclear => &[],
    };

    ClassificationResult {
        category,
        reason,
        suggested_reply: generate_reply(kind, original, context),
        classified_by: Backend::LocalModel,
    }
}

/// Sentiment model plus the keyword rule layer.
pub struct LocalModelClassifier {
    model: Arc<dyn SentimentModel>,
}

impl LocalModelClassifier {
    pub fn new(model: Arc<dyn SentimentModel>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl Classifier for LocalModelClassifier {
    fn tier(&self) -> Backend {
        Backend::LocalModel
    }

    async fn classify(&self, request: &ClassificationRequest) -> TierOutcome {
        let excerpt: String = request
            .original_text
            .chars()
            .take(SENTIMENT_INPUT_CHARS)
            .collect();

        let labels = match self.model.predict(&excerpt).await {
            Ok(labels) => labels,
            Err(err) => return TierOutcome::Deferred(format!("sentiment model failed: {err:#}")),
        };
        let Some(sentiment) = SentimentScores::from_labels(&labels) else {
            return TierOutcome::Deferred("sentiment model returned no star labels".to_string());
        };

        TierOutcome::Classified(classify_with_sentiment(
            &request.original_text,
            &request.normalized_text,
            sentiment,
        ))
    }
}
