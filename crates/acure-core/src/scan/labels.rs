//! Fixed classifier label set and canned recommendation tables.

use serde::{Deserialize, Serialize};

use super::model::{Prediction, Recommendations, ScanRecord};

/// Acne classes, in the classifier's output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AcneType {
    Blackheads,
    Cyst,
    Papules,
    Pustules,
    Whiteheads,
}

impl AcneType {
    /// Classifier output order.
    pub const ALL: [AcneType; 5] = [
        AcneType::Blackheads,
        AcneType::Cyst,
        AcneType::Papules,
        AcneType::Pustules,
        AcneType::Whiteheads,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            AcneType::Blackheads => "blackheads",
            AcneType::Cyst => "cyst",
            AcneType::Papules => "papules",
            AcneType::Pustules => "pustules",
            AcneType::Whiteheads => "whiteheads",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AcneType::Blackheads => "Blackheads (Komedo Hitam)",
            AcneType::Cyst => "Cyst (Kista)",
            AcneType::Papules => "Papules (Jerawat Padat)",
            AcneType::Pustules => "Pustules (Jerawat Bernanah)",
            AcneType::Whiteheads => "Whiteheads (Komedo Putih)",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.key() == key)
    }

    pub fn from_display_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.display_name() == name)
    }

    pub fn recommendations(&self) -> Recommendations {
        let (treatment, ingredients, severity): (&[&str], &[&str], &str) = match self {
            AcneType::Blackheads => (
                &[
                    "Gunakan produk dengan salicylic acid (BHA) 0.5-2%",
                    "Lakukan double cleansing dengan oil cleanser",
                    "Gunakan clay mask 1-2x seminggu",
                    "Hindari memencet komedo dengan tangan",
                ],
                &["Salicylic Acid", "Niacinamide", "Retinol", "Clay/Charcoal"],
                "Ringan",
            ),
            AcneType::Whiteheads => (
                &[
                    "Gunakan gentle exfoliant dengan AHA/BHA",
                    "Aplikasikan retinoid secara bertahap",
                    "Gunakan non-comedogenic moisturizer",
                    "Konsultasi dengan dermatolog jika tidak membaik",
                ],
                &["Salicylic Acid", "Glycolic Acid", "Retinol", "Niacinamide"],
                "Ringan",
            ),
            AcneType::Papules => (
                &[
                    "Gunakan benzoyl peroxide 2.5-5%",
                    "Aplikasikan anti-inflammatory ingredients",
                    "Hindari produk yang terlalu harsh",
                    "Pertimbangkan konsultasi dermatolog",
                ],
                &["Benzoyl Peroxide", "Niacinamide", "Azelaic Acid", "Tea Tree Oil"],
                "Sedang",
            ),
            AcneType::Pustules => (
                &[
                    "Gunakan kombinasi benzoyl peroxide dan salicylic acid",
                    "Aplikasikan spot treatment pada area bermasalah",
                    "Jaga kebersihan wajah tanpa over-cleansing",
                    "Konsultasi dermatolog untuk treatment yang tepat",
                ],
                &["Benzoyl Peroxide", "Salicylic Acid", "Sulfur", "Zinc"],
                "Sedang-Berat",
            ),
            AcneType::Cyst => (
                &[
                    "SEGERA konsultasi dengan dermatolog",
                    "Jangan mencoba memencet atau mengeluarkan sendiri",
                    "Gunakan gentle skincare routine",
                    "Pertimbangkan treatment medis seperti injeksi kortikosteroid",
                ],
                &["Gentle Cleanser", "Non-comedogenic Moisturizer"],
                "Berat",
            ),
        };

        Recommendations {
            treatment: treatment.iter().map(|s| s.to_string()).collect(),
            ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
            severity: severity.to_string(),
        }
    }
}

/// Recommendations for a display label, with a fallback for unknown labels.
pub fn recommendations_for_label(label: &str) -> Recommendations {
    match AcneType::from_display_name(label) {
        Some(acne_type) => acne_type.recommendations(),
        None => Recommendations {
            treatment: vec!["Konsultasi dengan dermatolog untuk diagnosis yang tepat".to_string()],
            ingredients: vec!["Gentle Skincare Products".to_string()],
            severity: "Tidak Diketahui".to_string(),
        },
    }
}

/// Rounds to two decimals.
pub fn round_confidence(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Ranks a raw probability vector against the label set.
///
/// Scores beyond the label count are dropped, missing scores count as zero,
/// non-finite scores count as zero. The result is sorted by confidence,
/// highest first; ties keep classifier order.
pub fn rank_scores(scores: &[f32]) -> Vec<Prediction> {
    if scores.len() != AcneType::ALL.len() {
        tracing::warn!(
            "Expected {} predictions, got {}",
            AcneType::ALL.len(),
            scores.len()
        );
    }

    let mut predictions: Vec<Prediction> = AcneType::ALL
        .iter()
        .enumerate()
        .map(|(idx, acne_type)| {
            let raw = scores.get(idx).copied().unwrap_or(0.0) as f64;
            let raw = if raw.is_finite() { raw } else { 0.0 };
            Prediction::new(acne_type.display_name(), round_confidence(raw))
        })
        .collect();

    predictions.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    predictions
}

impl ScanRecord {
    /// Builds a record straight from classifier output.
    pub fn from_scores(scores: &[f32], image_ref: impl Into<String>) -> Self {
        let predictions = rank_scores(scores);
        let recommendations = predictions
            .first()
            .map(|p| recommendations_for_label(&p.label))
            .unwrap_or_default();
        ScanRecord::from_predictions(predictions, image_ref, recommendations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_scores_sorts_and_rounds() {
        let ranked = rank_scores(&[0.104, 0.6049, 0.2, 0.05, 0.041]);
        assert_eq!(ranked[0].label, "Cyst (Kista)");
        assert_eq!(ranked[0].confidence, 0.6);
        assert_eq!(ranked[1].confidence, 0.2);
        assert_eq!(ranked[2].confidence, 0.1);
        assert!(ranked.windows(2).all(|w| w[0].confidence >= w[1].confidence));
    }

    #[test]
    fn test_rank_scores_pads_and_truncates() {
        assert_eq!(rank_scores(&[0.9]).len(), 5);
        assert_eq!(rank_scores(&[0.1, 0.1, 0.1, 0.1, 0.1, 0.9]).len(), 5);
        let padded = rank_scores(&[0.9]);
        assert_eq!(padded[0].label, "Blackheads (Komedo Hitam)");
        assert!(padded[1..].iter().all(|p| p.confidence == 0.0));
    }

    #[test]
    fn test_from_scores_derives_dominant_and_recommendations() {
        let record = ScanRecord::from_scores(&[0.05, 0.05, 0.1, 0.7, 0.1], "");
        assert_eq!(record.dominant_label, "Pustules (Jerawat Bernanah)");
        assert_eq!(record.confidence, 0.7);
        assert_eq!(record.recommendations.severity, "Sedang-Berat");
        assert!(record.is_consistent());
        assert!(record.id.is_none());
    }

    #[test]
    fn test_unknown_label_fallback() {
        let rec = recommendations_for_label("Rosacea");
        assert_eq!(rec.severity, "Tidak Diketahui");
        assert_eq!(rec.ingredients, vec!["Gentle Skincare Products"]);
    }

    #[test]
    fn test_key_round_trip() {
        for acne_type in AcneType::ALL {
            assert_eq!(AcneType::from_key(acne_type.key()), Some(acne_type));
        }
    }
}
