//! Dataset integrity checks run once at load. The resolver relies on these holding.

use super::{KnowledgeBase, KnowledgeError, HIGHLIGHT_ANCHORS, ITINERARY_KEYS, REQUIRED_FAQ_TOPICS};

pub(super) fn check(kb: &KnowledgeBase) -> Result<(), KnowledgeError> {
    for topic in REQUIRED_FAQ_TOPICS {
        if kb.faq(topic).is_none() {
            return Err(KnowledgeError::MissingFaq(topic.to_string()));
        }
    }

    for key in ITINERARY_KEYS {
        match kb.itinerary(key) {
            None => return Err(KnowledgeError::MissingItinerary(key.to_string())),
            Some([]) => return Err(KnowledgeError::EmptyItinerary(key.to_string())),
            Some(_) => {}
        }
    }

    for anchor in HIGHLIGHT_ANCHORS {
        let count = kb
            .highlights
            .iter()
            .filter(|h| h.title.contains(anchor))
            .count();
        match count {
            1 => {}
            0 => return Err(KnowledgeError::MissingHighlight(anchor.to_string())),
            count => {
                return Err(KnowledgeError::AmbiguousHighlight {
                    anchor: anchor.to_string(),
                    count,
                })
            }
        }
    }

    Ok(())
}
