use crate::color::ColorIdentity;
use crate::domain::{ClassifiedDeck, DeckEntry};

use super::rules::RuleSet;

/// Assign an archetype to a deck: first matching rule in evaluation order
/// wins; decks no rule claims fall back to the generic color-identity bucket.
///
/// Pure function of (deck, rule set) — no logging, no shared state, safe to
/// run across worker threads.
pub fn classify(entry: DeckEntry, identity: ColorIdentity, rules: &RuleSet) -> ClassifiedDeck {
    let counts = entry.combined_counts();

    let archetype = rules
        .for_format(&entry.format)
        .find(|rule| rule.matches(&counts))
        .map(|rule| rule.render_name(&identity.name))
        .unwrap_or_else(|| fallback_name(&identity));

    let label = composite_label(&identity, &archetype);

    ClassifiedDeck {
        entry,
        archetype,
        color_identity: identity,
        label,
    }
}

/// Generic bucket for unmatched decks: "<identity> Generic", or the identity
/// name alone for mono-color and colorless decks.
fn fallback_name(identity: &ColorIdentity) -> String {
    if identity.color_count() <= 1 {
        identity.name.clone()
    } else {
        format!("{} Generic", identity.name)
    }
}

/// "<identity> <archetype>" unless the archetype name already embeds the
/// identity name (a template that interpolated `{colors}`).
fn composite_label(identity: &ColorIdentity, archetype: &str) -> String {
    if archetype.contains(&identity.name) {
        archetype.to_string()
    } else {
        format!("{} {}", identity.name, archetype)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetype::rules::{ArchetypeRule, CardRequirement, RuleClause};
    use crate::color::{Color, ColorSet};
    use crate::domain::{CardCounts, DeckResult};
    use chrono::NaiveDate;

    fn deck(cards: &[(&str, u32)]) -> DeckEntry {
        let mut mainboard = CardCounts::new();
        for (name, count) in cards {
            mainboard.insert(name.to_string(), *count);
        }
        DeckEntry {
            id: "t#0".to_string(),
            tournament_id: "t".to_string(),
            player: "p".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            format: "Standard".to_string(),
            source: "test".to_string(),
            mainboard,
            sideboard: CardCounts::new(),
            result: DeckResult::default(),
        }
    }

    fn mono_red() -> ColorIdentity {
        ColorIdentity::from_set(ColorSet::from_colors([Color::Red]))
    }

    fn aggro_rule() -> ArchetypeRule {
        ArchetypeRule {
            id: "aggro".to_string(),
            name: "Aggro".to_string(),
            priority: 10,
            formats: vec![],
            requires: vec![
                RuleClause {
                    any: vec![CardRequirement {
                        card: "Monastery Swiftspear".to_string(),
                        min_count: 4,
                    }],
                },
                RuleClause {
                    any: vec![
                        CardRequirement {
                            card: "Lightning Strike".to_string(),
                            min_count: 1,
                        },
                        CardRequirement {
                            card: "Play with Fire".to_string(),
                            min_count: 1,
                        },
                    ],
                },
            ],
            excludes: vec![],
        }
    }

    #[test]
    fn test_mono_red_aggro_scenario() {
        let rules = RuleSet::new(vec![aggro_rule()]);
        let classified = classify(
            deck(&[
                ("Monastery Swiftspear", 4),
                ("Lightning Strike", 4),
                ("Mountain", 20),
            ]),
            mono_red(),
            &rules,
        );
        assert_eq!(classified.archetype, "Aggro");
        assert_eq!(classified.color_identity.name, "Mono Red");
        assert_eq!(classified.label, "Mono Red Aggro");
    }

    #[test]
    fn test_template_interpolation_skips_duplicate_prefix() {
        let mut rule = aggro_rule();
        rule.name = "{colors} Prowess".to_string();
        let rules = RuleSet::new(vec![rule]);
        let classified = classify(
            deck(&[("Monastery Swiftspear", 4), ("Lightning Strike", 2)]),
            mono_red(),
            &rules,
        );
        assert_eq!(classified.archetype, "Mono Red Prowess");
        assert_eq!(classified.label, "Mono Red Prowess");
    }

    #[test]
    fn test_fallback_generic_bucket() {
        let rules = RuleSet::new(vec![aggro_rule()]);
        let izzet = ColorIdentity::from_set(ColorSet::from_colors([Color::Blue, Color::Red]));
        let classified = classify(deck(&[("Consider", 4)]), izzet, &rules);
        assert_eq!(classified.archetype, "Izzet Generic");

        let classified = classify(deck(&[("Shock", 4)]), mono_red(), &rules);
        assert_eq!(classified.archetype, "Mono Red");
        assert_eq!(classified.label, "Mono Red");
    }

    #[test]
    fn test_priority_order_decides() {
        let mut low_priority = aggro_rule();
        low_priority.id = "burn".to_string();
        low_priority.name = "Burn".to_string();
        low_priority.priority = 50;
        let rules = RuleSet::new(vec![low_priority, aggro_rule()]);
        let classified = classify(
            deck(&[("Monastery Swiftspear", 4), ("Lightning Strike", 4)]),
            mono_red(),
            &rules,
        );
        assert_eq!(classified.archetype, "Aggro");
    }

    #[test]
    fn test_sideboard_counts_toward_rules() {
        let mut entry = deck(&[("Monastery Swiftspear", 4)]);
        entry
            .sideboard
            .insert("Lightning Strike".to_string(), 2);
        let rules = RuleSet::new(vec![aggro_rule()]);
        let classified = classify(entry, mono_red(), &rules);
        assert_eq!(classified.archetype, "Aggro");
    }
}
