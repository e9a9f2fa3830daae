//! Keyword tables for the resolver ladder. All keywords are lowercase and matched as substrings.

/// FAQ check that only fires while the topic itself is being visited.
pub(super) struct GatedRule {
    pub topic: &'static str,
    pub keywords: &'static [&'static str],
}

/// FAQ check that fires on the first visited topic, whatever it is.
pub(super) struct TopicRule {
    pub topic: &'static str,
    pub keywords: &'static [&'static str],
}

pub(super) struct ItineraryRule {
    pub keywords: &'static [&'static str],
    pub itinerary: &'static str,
    pub header: &'static str,
}

pub(super) struct HighlightRule {
    pub keywords: &'static [&'static str],
    pub anchor: &'static str,
}

pub(super) const GATED_RULES: [GatedRule; 3] = [
    GatedRule {
        topic: "visa",
        keywords: &["visa", "e-visa", "evisa"],
    },
    GatedRule {
        topic: "currency",
        keywords: &["money", "currency", "cash", "exchange", "atm"],
    },
    GatedRule {
        topic: "best_time",
        keywords: &["best time", "season", "weather", "rain"],
    },
];

pub(super) const TOPIC_RULES: [TopicRule; 5] = [
    TopicRule {
        topic: "safety",
        keywords: &["safety", "safe"],
    },
    TopicRule {
        topic: "health",
        keywords: &["health", "vaccine", "malaria"],
    },
    TopicRule {
        topic: "sim",
        keywords: &["sim", "mtn", "airtel", "internet"],
    },
    TopicRule {
        topic: "transport",
        keywords: &["transport", "bus", "drive", "car", "taxi"],
    },
    TopicRule {
        topic: "permits",
        keywords: &["permit", "gorilla"],
    },
];

pub(super) const ITINERARY_RULES: [ItineraryRule; 3] = [
    ItineraryRule {
        keywords: &["1 day", "one day", "day trip", "kigali"],
        itinerary: "1_day_kigali",
        header: "Here\u{2019}s a compact 1-day Kigali plan:",
    },
    ItineraryRule {
        keywords: &["3 day", "three day", "weekend", "adventure"],
        itinerary: "3_days_adventure",
        header: "A 3-day adventure idea:",
    },
    ItineraryRule {
        keywords: &["7 day", "seven day", "week long", "full week"],
        itinerary: "7_days_grand",
        header: "A 7-day grand tour:",
    },
];

pub(super) const HIGHLIGHT_RULES: [HighlightRule; 5] = [
    HighlightRule {
        keywords: &["volcano", "gorilla", "musanze"],
        anchor: "Volcanoes",
    },
    HighlightRule {
        keywords: &["akagera", "safari", "big five"],
        anchor: "Akagera",
    },
    HighlightRule {
        keywords: &["nyungwe", "canopy", "chimp"],
        anchor: "Nyungwe",
    },
    HighlightRule {
        keywords: &["kivu", "rubavu", "karongi", "lake"],
        anchor: "Kivu",
    },
    HighlightRule {
        keywords: &["memorial", "genocide", "kigali memorial"],
        anchor: "Genocide",
    },
];

#[inline]
pub(super) fn mentions_any(msg: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| msg.contains(k))
}
