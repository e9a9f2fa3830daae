//! Rule-based reply resolver: a fixed keyword ladder over the knowledge base.
//!
//! Evaluation order, first hit wins:
//!
//! 1. FAQ topics, walked in knowledge-file order. A topic answers when its own key
//!    appears in the message or one of its gated keywords does (visa, currency,
//!    best_time). The five topic rules (safety, health, sim, transport, permits)
//!    are not gated and are checked right after the *first* topic's gate, so they
//!    outrank the gates of every later topic.
//! 2. Itineraries (1-day Kigali, 3-day adventure, 7-day grand tour).
//! 3. Highlights, looked up by title anchor.
//! 4. [`DEFAULT_REPLY`].

mod rules;

use crate::knowledge::KnowledgeBase;
use rules::{mentions_any, GATED_RULES, HIGHLIGHT_RULES, ITINERARY_RULES, TOPIC_RULES};

/// Reply when no rule matches.
pub const DEFAULT_REPLY: &str = "Rwanda offers gorilla trekking, serene lakes, lush rainforests, and vibrant city life in Kigali. \
Tell me your travel dates, budget range, and interests (wildlife, culture, relaxation, hiking), and I'll craft a tailored plan.";

/// Resolves `message` to a reply from `kb`. Pure and deterministic.
pub fn resolve(message: &str, kb: &KnowledgeBase) -> String {
    let msg = message.to_lowercase();

    if let Some(answer) = match_faq(&msg, kb) {
        return answer.to_string();
    }
    if let Some(plan) = match_itinerary(&msg, kb) {
        return plan;
    }
    if let Some(place) = match_highlight(&msg, kb) {
        return place;
    }
    DEFAULT_REPLY.to_string()
}

/// True when the FAQ entry `topic` answers `msg` while it is being visited.
fn topic_gate_matches(topic: &str, msg: &str) -> bool {
    msg.contains(topic)
        || GATED_RULES
            .iter()
            .any(|rule| rule.topic == topic && mentions_any(msg, rule.keywords))
}

fn match_faq<'kb>(msg: &str, kb: &'kb KnowledgeBase) -> Option<&'kb str> {
    let mut faqs = kb.faqs();
    let (first_topic, first_answer) = faqs.next()?;
    if topic_gate_matches(first_topic, msg) {
        return Some(first_answer);
    }

    if let Some(rule) = TOPIC_RULES.iter().find(|rule| mentions_any(msg, rule.keywords)) {
        match kb.faq(rule.topic) {
            Some(answer) => return Some(answer),
            None => tracing::error!(topic = rule.topic, "faq topic missing from knowledge base"),
        }
    }

    faqs.find(|(topic, _)| topic_gate_matches(topic, msg))
        .map(|(_, answer)| answer)
}

fn match_itinerary(msg: &str, kb: &KnowledgeBase) -> Option<String> {
    let rule = ITINERARY_RULES
        .iter()
        .find(|rule| mentions_any(msg, rule.keywords))?;
    let Some(steps) = kb.itinerary(rule.itinerary) else {
        tracing::error!(itinerary = rule.itinerary, "itinerary missing from knowledge base");
        return None;
    };

    let mut plan = String::from(rule.header);
    for step in steps {
        plan.push_str("\n- ");
        plan.push_str(step);
    }
    Some(plan)
}

fn match_highlight(msg: &str, kb: &KnowledgeBase) -> Option<String> {
    let rule = HIGHLIGHT_RULES
        .iter()
        .find(|rule| mentions_any(msg, rule.keywords))?;
    let Some(h) = kb.highlight_by_anchor(rule.anchor) else {
        tracing::error!(anchor = rule.anchor, "no highlight title contains anchor; dataset and rules have drifted");
        return None;
    };
    Some(format!("{}: {} Tips: {}", h.title, h.desc, h.tips.join("; ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::tests::{sample_kb, SAMPLE_KNOWLEDGE};
    use crate::knowledge::{HIGHLIGHT_ANCHORS, ITINERARY_KEYS, REQUIRED_FAQ_TOPICS};

    /// Sample knowledge with `first` moved to the front of the FAQ mapping.
    fn kb_with_first_topic(first: &str) -> KnowledgeBase {
        let kb = sample_kb();
        let mut faqs: Vec<(String, String)> = kb
            .faqs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let idx = faqs.iter().position(|(k, _)| k == first).unwrap();
        let entry = faqs.remove(idx);
        faqs.insert(0, entry);
        let itineraries = ITINERARY_KEYS
            .iter()
            .map(|k| (k.to_string(), kb.itinerary(k).unwrap().to_vec()))
            .collect();
        KnowledgeBase::from_parts(faqs, itineraries, kb.highlights().to_vec()).unwrap()
    }

    #[test]
    fn rule_topics_are_required_by_the_loader() {
        for rule in GATED_RULES.iter().map(|r| r.topic).chain(TOPIC_RULES.iter().map(|r| r.topic)) {
            assert!(REQUIRED_FAQ_TOPICS.contains(&rule), "{} not validated", rule);
        }
        for rule in ITINERARY_RULES.iter() {
            assert!(ITINERARY_KEYS.contains(&rule.itinerary));
        }
        for rule in HIGHLIGHT_RULES.iter() {
            assert!(HIGHLIGHT_ANCHORS.contains(&rule.anchor));
        }
    }

    #[test]
    fn resolve_is_deterministic() {
        let kb = sample_kb();
        for msg in ["Do I need a visa?", "plan a 3 day weekend trip", "anything random"] {
            assert_eq!(resolve(msg, &kb), resolve(msg, &kb));
        }
    }

    #[test]
    fn visa_question_returns_visa_faq() {
        let kb = sample_kb();
        assert_eq!(resolve("Do I need a visa?", &kb), "VISA ANSWER");
        assert_eq!(resolve("How do I apply for an E-VISA", &kb), "VISA ANSWER");
    }

    #[test]
    fn safety_wins_regardless_of_topic_order() {
        for first in REQUIRED_FAQ_TOPICS {
            let kb = kb_with_first_topic(first);
            assert_eq!(resolve("What's the safety situation?", &kb), "SAFETY ANSWER", "first topic {}", first);
        }
    }

    #[test]
    fn topic_rules_outrank_later_gated_topics() {
        // visa first: safety fires before the currency gate is reached.
        let kb = sample_kb();
        assert_eq!(resolve("Is it safe to exchange money?", &kb), "SAFETY ANSWER");

        // currency first: its gate is checked before the topic rules.
        let kb = kb_with_first_topic("currency");
        assert_eq!(resolve("Is it safe to exchange money?", &kb), "CURRENCY ANSWER");
    }

    #[test]
    fn gated_topics_reached_after_topic_rules() {
        let kb = sample_kb();
        assert_eq!(resolve("Where can I exchange money?", &kb), "CURRENCY ANSWER");
        assert_eq!(resolve("When is the rainy season?", &kb), "BEST TIME ANSWER");
    }

    #[test]
    fn topic_key_substring_answers() {
        let kb = sample_kb();
        assert_eq!(resolve("tell me about best_time", &kb), "BEST TIME ANSWER");
    }

    #[test]
    fn topic_rules_in_order() {
        let kb = sample_kb();
        assert_eq!(resolve("Do I need malaria pills?", &kb), "HEALTH ANSWER");
        assert_eq!(resolve("Can I buy an MTN sim card?", &kb), "SIM ANSWER");
        assert_eq!(resolve("Should I take a taxi?", &kb), "TRANSPORT ANSWER");
        assert_eq!(resolve("How much is a permit?", &kb), "PERMITS ANSWER");
    }

    #[test]
    fn substring_keywords_are_not_word_bound() {
        // "card" contains "car".
        let kb = sample_kb();
        assert_eq!(resolve("Do shops take a credit card?", &kb), "TRANSPORT ANSWER");
    }

    #[test]
    fn gorilla_hits_permits_before_highlight() {
        let kb = sample_kb();
        assert_eq!(resolve("tell me about gorilla trekking", &kb), "PERMITS ANSWER");
    }

    #[test]
    fn three_day_itinerary() {
        let kb = sample_kb();
        let reply = resolve("plan a 3 day weekend trip", &kb);
        assert_eq!(
            reply,
            "A 3-day adventure idea:\n- Day 1: Drive to Musanze\n- Day 2: Gorilla trek\n- Day 3: Twin Lakes"
        );
    }

    #[test]
    fn one_day_itinerary_outranks_memorial_highlight() {
        let kb = sample_kb();
        let reply = resolve("Visiting the Kigali memorial", &kb);
        assert!(reply.starts_with("Here\u{2019}s a compact 1-day Kigali plan:\n- "), "{}", reply);
        assert!(reply.ends_with("- Inema Arts Center"));
    }

    #[test]
    fn seven_day_itinerary() {
        let kb = sample_kb();
        let reply = resolve("I have a full week", &kb);
        let mut lines = reply.lines();
        assert_eq!(lines.next(), Some("A 7-day grand tour:"));
        let steps: Vec<&str> = lines.collect();
        assert_eq!(steps, vec!["- Kigali", "- Volcanoes", "- Lake Kivu", "- Nyungwe", "- Akagera"]);
    }

    #[test]
    fn highlight_replies() {
        let kb = sample_kb();
        assert_eq!(
            resolve("musanze volcano hike", &kb),
            "Volcanoes National Park: Home of mountain gorillas. Tips: Book permits early; Bring gloves"
        );
        assert_eq!(
            resolve("Akagera big five", &kb),
            "Akagera National Park: Savannah safari. Tips: Self-drive is possible"
        );
        assert_eq!(
            resolve("chimp tracking in nyungwe", &kb),
            "Nyungwe Forest: Ancient rainforest. Tips: Canopy walk at dawn; Rain jacket"
        );
        assert_eq!(
            resolve("lake kivu beaches", &kb),
            "Lake Kivu: Great lakes beaches. Tips: Boat to Napoleon Island"
        );
        assert_eq!(
            resolve("genocide memorial", &kb),
            "Kigali Genocide Memorial: Place of remembrance. Tips: Allow two hours; Dress respectfully"
        );
    }

    #[test]
    fn highlight_without_tips() {
        let raw = SAMPLE_KNOWLEDGE.replace(r#""tips": ["Boat to Napoleon Island"]"#, r#""tips": []"#);
        let kb = KnowledgeBase::from_json_str(&raw).unwrap();
        assert_eq!(resolve("rubavu", &kb), "Lake Kivu: Great lakes beaches. Tips: ");
    }

    #[test]
    fn unmatched_message_gets_default() {
        let kb = sample_kb();
        assert_eq!(resolve("anything random", &kb), DEFAULT_REPLY);
    }

    #[test]
    fn matching_ignores_case() {
        let kb = sample_kb();
        assert_eq!(resolve("VACCINE requirements", &kb), "HEALTH ANSWER");
    }
}
