//! Template-based short video ideation
//!
//! Ideas are produced from fixed templates, one per seed. The same inputs
//! always produce the same ideas.

use crate::models::ContentIdea;

/// Maximum number of keywords used as seeds
pub const MAX_SEEDS: usize = 3;

/// Hashtags attached to every idea after the niche tag
const GENERIC_HASHTAGS: [&str; 3] = ["#shorts", "#fyp", "#viral"];

const ANGLE: &str = "Listicle cepat 3 poin";
const CTA: &str = "Follow untuk tips harian!";
const POSTING_TIME: &str = "19:00 WIB";

/// Generate 1 to 3 content ideas for a niche
///
/// The first three keywords are used as seeds. Without keywords the niche
/// itself is the only seed. Nothing is persisted here. The text is always
/// Indonesian; `language` is accepted but does not change the output.
pub fn generate_shorts_ideas(niche: &str, keywords: &[String], _language: &str) -> Vec<ContentIdea> {
    let niche_tag = hashtag(niche);

    let seeds: Vec<&str> = if keywords.is_empty() {
        vec![niche]
    } else {
        keywords.iter().take(MAX_SEEDS).map(String::as_str).collect()
    };

    seeds
        .into_iter()
        .enumerate()
        .map(|(i, seed)| {
            let mut hashtags = Vec::with_capacity(GENERIC_HASHTAGS.len() + 2);
            hashtags.push(niche_tag.clone());
            hashtags.extend(GENERIC_HASHTAGS.iter().map(|tag| tag.to_string()));
            hashtags.push(hashtag(seed));

            ContentIdea {
                channel_id: None,
                topic: seed.to_string(),
                hook: format!("{} yang jarang dibahas!", title_case(seed)),
                angle: ANGLE.to_string(),
                cta: CTA.to_string(),
                title: format!("{} dalam 30 Detik: Tips #{}", title_case(seed), i + 1),
                description: format!(
                    "Ringkasan {} singkat, praktis, dan mudah dipraktekkan. Simpan dan bagikan!",
                    seed
                ),
                hashtags,
                posting_time: POSTING_TIME.to_string(),
            }
        })
        .collect()
}

/// Fixed sample returned when stored ideas cannot be read
pub fn sample_ideas() -> Vec<ContentIdea> {
    let keywords = ["produktif", "mindset", "bisnis"].map(String::from);
    generate_shorts_ideas("motivasi", &keywords, "id")
}

/// `#` followed by the text with spaces removed
fn hashtag(text: &str) -> String {
    format!("#{}", text.replace(' ', ""))
}

/// Upper-case the first cased letter of every word and lower-case the rest.
/// A word starts after any character without case (space, digit, punctuation).
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_cased = false;

    for c in text.chars() {
        let cased = c.is_lowercase() || c.is_uppercase();
        if cased {
            if prev_cased {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
        } else {
            out.push(c);
        }
        prev_cased = cased;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_two_keywords_give_two_ideas() {
        let ideas = generate_shorts_ideas("fitness", &words(&["pushup", "diet"]), "id");

        assert_eq!(ideas.len(), 2);
        assert_eq!(ideas[0].topic, "pushup");
        assert!(ideas[0].title.contains("Pushup"));
        assert!(ideas[0].title.contains("#1"));
        assert_eq!(ideas[1].topic, "diet");
        assert!(ideas[1].title.contains("#2"));
    }

    #[test]
    fn test_no_keywords_uses_niche() {
        let ideas = generate_shorts_ideas("motivasi", &[], "id");

        assert_eq!(ideas.len(), 1);
        assert_eq!(ideas[0].topic, "motivasi");
        assert_eq!(ideas[0].title, "Motivasi dalam 30 Detik: Tips #1");
    }

    #[test]
    fn test_seed_count_is_capped() {
        for n in 0..8 {
            let keywords: Vec<String> = (0..n).map(|i| format!("kw{}", i)).collect();
            let ideas = generate_shorts_ideas("niche", &keywords, "id");
            let expected = if n == 0 { 1 } else { n.min(MAX_SEEDS) };
            assert_eq!(ideas.len(), expected, "keywords: {}", n);
        }
    }

    #[test]
    fn test_only_first_three_keywords_are_seeds() {
        let ideas = generate_shorts_ideas("x", &words(&["a", "b", "c", "d"]), "id");
        let topics: Vec<&str> = ideas.iter().map(|i| i.topic.as_str()).collect();
        assert_eq!(topics, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_deterministic() {
        let keywords = words(&["home workout", "meal prep"]);
        let first = serde_json::to_string(&generate_shorts_ideas("fitness", &keywords, "id")).unwrap();
        let second = serde_json::to_string(&generate_shorts_ideas("fitness", &keywords, "id")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_hashtags() {
        let ideas = generate_shorts_ideas("personal finance", &words(&["dana darurat"]), "id");

        assert_eq!(
            ideas[0].hashtags,
            vec!["#personalfinance", "#shorts", "#fyp", "#viral", "#danadarurat"]
        );
    }

    #[test]
    fn test_indonesian_templates() {
        let idea = &generate_shorts_ideas("fitness", &words(&["pushup"]), "id")[0];

        assert_eq!(idea.hook, "Pushup yang jarang dibahas!");
        assert_eq!(idea.angle, "Listicle cepat 3 poin");
        assert_eq!(idea.cta, "Follow untuk tips harian!");
        assert_eq!(
            idea.description,
            "Ringkasan pushup singkat, praktis, dan mudah dipraktekkan. Simpan dan bagikan!"
        );
        assert_eq!(idea.posting_time, "19:00 WIB");
        assert_eq!(idea.channel_id, None);
    }

    #[test]
    fn test_language_does_not_change_output() {
        let keywords = words(&["pushup", "diet"]);
        let id = generate_shorts_ideas("fitness", &keywords, "id");

        assert_eq!(generate_shorts_ideas("fitness", &keywords, "en"), id);
        assert_eq!(generate_shorts_ideas("fitness", &keywords, "fr"), id);
        assert_eq!(generate_shorts_ideas("fitness", &keywords, ""), id);
    }

    #[test]
    fn test_sample_ideas() {
        let ideas = sample_ideas();
        let topics: Vec<&str> = ideas.iter().map(|i| i.topic.as_str()).collect();

        assert_eq!(topics, vec!["produktif", "mindset", "bisnis"]);
        assert!(ideas.iter().all(|i| i.hashtags[0] == "#motivasi"));
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("pushup"), "Pushup");
        assert_eq!(title_case("home WORKOUT"), "Home Workout");
        assert_eq!(title_case("3d printing"), "3D Printing");
        assert_eq!(title_case("self-care"), "Self-Care");
        assert_eq!(title_case(""), "");
    }
}
