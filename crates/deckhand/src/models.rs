//! Wire-level data model of the flashcard service.
//!
//! All payloads are camelCase JSON. `unique_id` is the only identity used
//! for lookup and equality across fetches; the numeric `id` is an opaque
//! server-internal value and is never compared client-side.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Anything addressable by a stable server-assigned unique id.
///
/// The id is never reused and never mutated client-side.
pub trait Keyed {
    fn unique_id(&self) -> &str;
}

/// A named collection of cards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stack {
    pub id: i64,
    pub unique_id: String,
    pub name: String,
    /// Hex color string, e.g. `#059669`.
    pub color: String,
    /// Cards in display order. Order is not semantically significant.
    pub cards: Vec<Card>,
}

impl Keyed for Stack {
    fn unique_id(&self) -> &str {
        &self.unique_id
    }
}

/// A question/answer pair, optionally with review history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: i64,
    pub unique_id: String,
    pub question: String,
    pub answer: String,
    pub hint: Option<String>,
    /// Present only once the card has review history.
    pub maturity: Option<CardMaturity>,
    /// Present only when the card is served as the next due card. The set
    /// of options is server-determined and may vary per card.
    #[serde(rename = "difficultyAndDurations")]
    pub rating_options: Option<Vec<RatingOption>>,
}

impl Card {
    /// A card can only enter the review flow when the server attached
    /// rating options to it.
    #[must_use]
    pub fn is_reviewable(&self) -> bool {
        self.rating_options.is_some()
    }
}

impl Keyed for Card {
    fn unique_id(&self) -> &str {
        &self.unique_id
    }
}

/// A card's spaced-repetition state, computed server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardMaturity {
    pub id: i64,
    /// Due timestamp as sent by the server (ISO 8601, with or without
    /// fractional seconds).
    #[serde(rename = "maturity")]
    pub due_at: String,
    pub level: i64,
}

impl CardMaturity {
    /// Parse the server's due timestamp.
    #[must_use]
    pub fn due_date(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.due_at)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }

    /// Whether the card is due now or within the next `days` days.
    #[must_use]
    pub fn is_due_within(&self, days: i64, now: DateTime<Utc>) -> bool {
        self.due_date()
            .is_some_and(|due| due <= now + Duration::days(days))
    }
}

/// A rating choice the server offers for the current card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingOption {
    pub difficulty: Difficulty,
    pub duration: RatingDuration,
}

impl RatingOption {
    #[must_use]
    pub fn difficulty_id(&self) -> i64 {
        self.difficulty.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Difficulty {
    pub id: i64,
    pub name: String,
    /// Hex color string for the rating button.
    pub color: String,
}

/// How long until the card comes back, as display text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingDuration {
    pub display_label: String,
}

// ---------- Request / response payloads ----------

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    /// The service's wire name for the email field.
    pub mail: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub name: String,
    pub mail: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub username: String,
}

/// Structured error body the server attaches to non-2xx responses.
/// `message` is a machine-readable code, not display text.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorResponse {
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateStackRequest {
    pub name: String,
    pub color: String,
}

/// Shared payload for card create (no `card_id`) and update.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRequest {
    pub stack_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_id: Option<String>,
    pub question: String,
    pub answer: String,
}

/// Card deletion carries a question/answer snapshot of the card being
/// removed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteCardRequest {
    pub stack_id: String,
    pub card_id: String,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardRatingRequest {
    pub stack_id: String,
    pub card_id: String,
    pub difficulty_id: i64,
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_deserializes_from_service_json() {
        let json = r##"{
            "id": 7,
            "uniqueId": "card-7",
            "question": "Q",
            "answer": "A",
            "hint": "think geography",
            "maturity": {"id": 1, "maturity": "2026-02-15T10:00:00Z", "level": 2},
            "difficultyAndDurations": [
                {
                    "difficulty": {"id": 2, "name": "Good", "color": "#059669"},
                    "duration": {"displayLabel": "3 days"}
                }
            ]
        }"##;

        let card: Card = serde_json::from_str(json).unwrap();
        assert_eq!(card.unique_id, "card-7");
        assert_eq!(card.hint.as_deref(), Some("think geography"));
        assert!(card.is_reviewable());

        let maturity = card.maturity.unwrap();
        assert_eq!(maturity.level, 2);
        assert_eq!(maturity.due_at, "2026-02-15T10:00:00Z");

        let options = card.rating_options.unwrap();
        assert_eq!(options[0].difficulty_id(), 2);
        assert_eq!(options[0].duration.display_label, "3 days");
    }

    #[test]
    fn card_without_rating_options_is_not_reviewable() {
        let json = r#"{
            "id": 7,
            "uniqueId": "card-7",
            "question": "Q",
            "answer": "A",
            "hint": null,
            "maturity": null
        }"#;

        let card: Card = serde_json::from_str(json).unwrap();
        assert!(!card.is_reviewable());
        assert!(card.maturity.is_none());
    }

    #[test]
    fn maturity_parses_due_dates_with_and_without_fractional_seconds() {
        let plain = CardMaturity {
            id: 1,
            due_at: "2026-02-15T10:00:00Z".to_string(),
            level: 1,
        };
        assert!(plain.due_date().is_some());

        let fractional = CardMaturity {
            id: 1,
            due_at: "2026-02-15T10:00:00.123Z".to_string(),
            level: 1,
        };
        assert!(fractional.due_date().is_some());

        let garbage = CardMaturity {
            id: 1,
            due_at: "someday".to_string(),
            level: 1,
        };
        assert!(garbage.due_date().is_none());
    }

    #[test]
    fn is_due_within_widens_with_lookahead() {
        let now = DateTime::parse_from_rfc3339("2026-02-14T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let maturity = CardMaturity {
            id: 1,
            due_at: "2026-02-15T10:00:00Z".to_string(),
            level: 1,
        };

        assert!(!maturity.is_due_within(0, now));
        assert!(maturity.is_due_within(2, now));
    }

    #[test]
    fn card_request_omits_card_id_on_create() {
        let create = CardRequest {
            stack_id: "s1".to_string(),
            card_id: None,
            question: "Q".to_string(),
            answer: "A".to_string(),
        };
        let json = serde_json::to_string(&create).unwrap();
        assert!(!json.contains("cardId"));
        assert!(json.contains("stackId"));

        let update = CardRequest {
            card_id: Some("c1".to_string()),
            ..create
        };
        let json = serde_json::to_string(&update).unwrap();
        assert!(json.contains("\"cardId\":\"c1\""));
    }

    #[test]
    fn login_request_uses_mail_wire_name() {
        let req = LoginRequest {
            mail: "a@b.c".to_string(),
            password: "secret".to_string(),
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"mail\":\"a@b.c\""));
    }
}
