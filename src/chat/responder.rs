//! Canned reply selection.
//!
//! Questions are routed by plain substring matching against an ordered
//! keyword table. Categories are tried in [`ResponseCategory::ALL`] order and
//! the first one with a matching keyword wins, so a question mentioning both
//! symptoms and treatment gets the symptoms answer.

use serde::Serialize;

/// Greeting seeded into every fresh message log.
pub const GREETING: &str = "Hello! I'm your KidneyScan AI assistant. How can I help you with \
                            kidney cancer detection and information today?";

/// Reply used when no keyword category matches.
pub const FALLBACK_RESPONSE: &str = "That's a great question. To give you the most accurate \
     information for your specific situation, I'd recommend consulting with a healthcare \
     professional. Would you like me to provide general information about kidney cancer \
     detection or screening options?";

/// Topic a question was routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseCategory {
    /// Signs and symptoms.
    Symptoms,
    /// Treatment options.
    Treatment,
    /// Risk factors and causes.
    RiskFactors,
    /// Reliability of the detection model.
    Accuracy,
    /// How screening works.
    Screening,
}

impl ResponseCategory {
    /// Every category, in match priority order.
    pub const ALL: [Self; 5] = [
        Self::Symptoms,
        Self::Treatment,
        Self::RiskFactors,
        Self::Accuracy,
        Self::Screening,
    ];

    /// Lowercase keywords that route a question to this category.
    #[must_use]
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Self::Symptoms => &["symptom", "sign"],
            Self::Treatment => &["treatment", "therapy"],
            Self::RiskFactors => &["risk", "cause"],
            Self::Accuracy => &["accuracy", "accurate", "reliable", "detection"],
            Self::Screening => &["test", "scan", "screening"],
        }
    }

    /// Canned reply for this category.
    #[must_use]
    pub fn response(self) -> &'static str {
        match self {
            Self::Symptoms => {
                "Common symptoms of kidney cancer may include blood in urine, pain in your side \
                 that doesn't go away, loss of appetite, unexplained weight loss, and fatigue. \
                 However, many people with kidney cancer don't have obvious symptoms, especially \
                 in early stages."
            }
            Self::Treatment => {
                "Kidney cancer treatment options depend on the stage and type, but may include \
                 surgery, targeted therapy, immunotherapy, radiation therapy, or chemotherapy. \
                 Your healthcare provider will recommend the best approach based on your \
                 specific situation."
            }
            Self::RiskFactors => {
                "Risk factors for kidney cancer include smoking, obesity, high blood pressure, \
                 family history of kidney cancer, certain genetic conditions, long-term dialysis, \
                 and workplace exposure to specific chemicals."
            }
            Self::Accuracy => {
                "Our KidneyScan AI detection technology has demonstrated over 95% accuracy in \
                 clinical studies for detecting kidney tumors. However, it's designed as a \
                 preliminary screening tool and should be followed up with consultation from \
                 healthcare professionals."
            }
            Self::Screening => {
                "Our kidney cancer screening uses AI to analyze images of your kidneys. You can \
                 upload images from CT scans, MRIs, or ultrasounds for analysis. The process is \
                 non-invasive and provides quick preliminary results."
            }
        }
    }

    /// Stable name used in logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Symptoms => "symptoms",
            Self::Treatment => "treatment",
            Self::RiskFactors => "risk_factors",
            Self::Accuracy => "accuracy",
            Self::Screening => "screening",
        }
    }

    fn matches(self, lowered: &str) -> bool {
        self.keywords().iter().any(|keyword| lowered.contains(keyword))
    }
}

/// Route a question to the first category whose keywords it contains.
#[must_use]
pub fn classify(question: &str) -> Option<ResponseCategory> {
    let lowered = question.to_lowercase();
    ResponseCategory::ALL
        .into_iter()
        .find(|category| category.matches(&lowered))
}

/// Pick the canned reply for a question.
///
/// Total over all inputs: anything that matches no category gets
/// [`FALLBACK_RESPONSE`].
#[must_use]
pub fn select_response(question: &str) -> &'static str {
    classify(question).map_or(FALLBACK_RESPONSE, ResponseCategory::response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_questions() {
        assert_eq!(
            select_response("What are the symptoms?"),
            ResponseCategory::Symptoms.response()
        );
        assert_eq!(
            select_response("What treatment is available?"),
            ResponseCategory::Treatment.response()
        );
        assert_eq!(
            select_response("Is this accurate?"),
            ResponseCategory::Accuracy.response()
        );
        assert_eq!(
            select_response("Tell me about kidney stones history"),
            FALLBACK_RESPONSE
        );
    }

    #[test]
    fn test_symptoms_take_priority() {
        let question = "Which therapy helps with these symptoms?";
        assert_eq!(classify(question), Some(ResponseCategory::Symptoms));
        assert_eq!(select_response(question), ResponseCategory::Symptoms.response());
    }

    #[test]
    fn test_earlier_category_wins_over_later() {
        // "risk" (priority 3) beats "scan" (priority 5).
        assert_eq!(
            classify("Is a scan worth the risk?"),
            Some(ResponseCategory::RiskFactors)
        );
        // "detection" (priority 4) beats "screening" (priority 5).
        assert_eq!(
            classify("early detection through screening"),
            Some(ResponseCategory::Accuracy)
        );
    }

    #[test]
    fn test_matching_ignores_case() {
        assert_eq!(classify("SIGNS OF CANCER"), Some(ResponseCategory::Symptoms));
        assert_eq!(classify("Is It Reliable"), Some(ResponseCategory::Accuracy));
        assert_eq!(classify("What CAUSES it"), Some(ResponseCategory::RiskFactors));
    }

    #[test]
    fn test_keywords_match_inside_words() {
        assert_eq!(classify("immunotherapy"), Some(ResponseCategory::Treatment));
        assert_eq!(classify("CT scanning"), Some(ResponseCategory::Screening));
        assert_eq!(classify("blood tests"), Some(ResponseCategory::Screening));
    }

    #[test]
    fn test_every_category_is_reachable() {
        for category in ResponseCategory::ALL {
            for keyword in category.keywords() {
                let question = format!("tell me about {keyword}");
                let routed = classify(&question).expect("keyword should match");
                // A keyword may also hit a higher-priority category, never a lower one.
                let routed_rank = ResponseCategory::ALL.iter().position(|c| *c == routed);
                let own_rank = ResponseCategory::ALL.iter().position(|c| *c == category);
                assert!(routed_rank <= own_rank, "{keyword} routed to {routed:?}");
            }
        }
    }

    #[test]
    fn test_responses_never_empty() {
        for question in ["a", "?", "kidney", "héllo wörld", "SYMPTOM", "   x   "] {
            assert!(!select_response(question).is_empty());
        }
        for category in ResponseCategory::ALL {
            assert!(!category.response().is_empty());
        }
        assert!(!FALLBACK_RESPONSE.is_empty());
    }

    #[test]
    fn test_unmatched_question_has_no_category() {
        assert_eq!(classify("hello there"), None);
    }
}
