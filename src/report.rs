//! Plain-text rendering of reconstruction results.
//!
//! This is the only place card metadata is consulted. Split-card halves
//! are folded onto their full card and unknown ids are shown raw.

use std::fmt;

use crate::cards::{CardRegistry, CardType};
use crate::core::Seat;
use crate::engine::MatchReport;
use crate::matches::MatchSummary;
use crate::reveal::CardCounts;

const RULE: &str = "============================================================";

/// Cards of one type, sorted by name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeGroup {
    pub card_type: CardType,
    pub cards: Vec<(String, u32)>,
}

impl TypeGroup {
    /// Number of cards in the group, duplicates included.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.cards.iter().map(|(_, count)| count).sum()
    }
}

/// Group counts by primary card type, in display order. Empty groups are omitted.
#[must_use]
pub fn group_by_type(counts: &CardCounts, registry: &CardRegistry) -> Vec<TypeGroup> {
    let mut canonical = CardCounts::new();
    for entry in counts.iter() {
        canonical.add_many(registry.canonical(entry.card_id), entry.count);
    }

    let mut groups: Vec<TypeGroup> = CardType::DISPLAY_ORDER
        .iter()
        .map(|&card_type| TypeGroup {
            card_type,
            cards: Vec::new(),
        })
        .collect();

    for entry in canonical.iter() {
        let lookup = registry.resolve(entry.card_id);
        let card_type = lookup.definition().map_or(CardType::Other, |def| def.primary_type());
        if let Some(group) = groups.iter_mut().find(|g| g.card_type == card_type) {
            group.cards.push((lookup.display_name().into_owned(), entry.count));
        }
    }

    groups.retain(|g| !g.cards.is_empty());
    for group in &mut groups {
        group.cards.sort();
    }
    groups
}

fn write_groups(f: &mut fmt::Formatter<'_>, groups: &[TypeGroup]) -> fmt::Result {
    if groups.is_empty() {
        return writeln!(f, "  (None)");
    }
    for group in groups {
        writeln!(f)?;
        writeln!(f, "  {} ({}):", group.card_type.plural(), group.total())?;
        for (name, count) in &group.cards {
            if *count > 1 {
                writeln!(f, "    - {} (x{})", name, count)?;
            } else {
                writeln!(f, "    - {}", name)?;
            }
        }
    }
    Ok(())
}

/// A `MatchReport` with names resolved, ready to print.
pub struct RenderedReport<'a> {
    report: &'a MatchReport,
    registry: &'a CardRegistry,
}

impl<'a> RenderedReport<'a> {
    pub fn new(report: &'a MatchReport, registry: &'a CardRegistry) -> Self {
        Self { report, registry }
    }

    fn write_local(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;
        let local = report.local_seat;
        let revealed = report.revealed_by(local);

        writeln!(f, "{}", RULE)?;
        writeln!(f, "YOUR DECK ({})", local)?;
        writeln!(f, "{}", RULE)?;
        writeln!(f, "REVEALED CARDS:")?;
        write_groups(f, &group_by_type(revealed, self.registry))?;
        writeln!(f)?;

        if !report.deck.is_empty() {
            let total = report.deck.total() + report.commanders[local].len() as u32;
            let shown = revealed.total();
            writeln!(
                f,
                "Deck: {} cards total | {} revealed | {} unrevealed",
                total,
                shown,
                total.saturating_sub(shown)
            )?;
        }
        if !report.sideboard.is_empty() {
            writeln!(f, "Sideboard: {} cards", report.sideboard.total())?;
        }
        Ok(())
    }

    fn write_opponent(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;
        let opponent = report.opponent_seat();
        let revealed = report.revealed_by(opponent);

        writeln!(f, "{}", RULE)?;
        match &report.opponent_name {
            Some(name) => writeln!(f, "OPPONENT'S DECK ({}, {})", name, opponent)?,
            None => writeln!(f, "OPPONENT'S DECK ({})", opponent)?,
        }
        writeln!(f, "{}", RULE)?;

        if revealed.is_empty() {
            match report.library_sizes[opponent] {
                0 => writeln!(f, "No opponent cards found")?,
                size => writeln!(f, "No cards revealed (opponent has {} cards in deck)", size)?,
            }
        } else {
            let groups = group_by_type(revealed, self.registry);
            let unique: usize = groups.iter().map(|g| g.cards.len()).sum();
            writeln!(f, "REVEALED CARDS:")?;
            write_groups(f, &groups)?;
            writeln!(f)?;
            writeln!(
                f,
                "Revealed: {} unique cards | {} total cards",
                unique,
                revealed.total()
            )?;
        }

        for &commander in &report.commanders[opponent] {
            let name = self.registry.resolve(self.registry.canonical(commander)).display_name();
            writeln!(f, "Commander detected: {}", name)?;
        }
        Ok(())
    }

    fn write_unconfirmed(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.report.unconfirmed.is_empty() {
            return Ok(());
        }
        writeln!(f)?;
        writeln!(f, "Unconfirmed (excluded from counts, verify manually):")?;
        for card in &self.report.unconfirmed {
            let name = self.registry.resolve(self.registry.canonical(card.card_id)).display_name();
            let owner = card.owner.map_or_else(|| "unknown seat".to_owned(), |s: Seat| s.to_string());
            match card.last_zone {
                Some(zone) => writeln!(f, "  - {} ({}, {}, left {})", name, card.instance_id, owner, zone)?,
                None => writeln!(f, "  - {} ({}, {})", name, card.instance_id, owner)?,
            }
        }
        Ok(())
    }
}

impl fmt::Display for RenderedReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.report;
        write!(f, "Match {}", report.match_id)?;
        if !report.complete {
            write!(f, " (in progress)")?;
        }
        writeln!(f)?;
        writeln!(f)?;

        self.write_local(f)?;
        writeln!(f)?;
        self.write_opponent(f)?;
        self.write_unconfirmed(f)
    }
}

/// Match list, one line per match.
pub struct MatchList<'a>(pub &'a [MatchSummary]);

impl fmt::Display for MatchList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, summary) in self.0.iter().enumerate() {
            write!(f, "{:3}. {}", i + 1, summary.id.short())?;
            if let Some(start) = &summary.start {
                write!(f, "  started {}", start)?;
            }
            if let Some(end) = &summary.end {
                write!(f, "  ended {}", end)?;
            }
            if let Some(name) = &summary.opponent_name {
                write!(f, "  vs {}", name)?;
            }
            if !summary.completed {
                write!(f, "  (in progress)")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDefinition, CardId};

    fn registry() -> CardRegistry {
        let mut registry = CardRegistry::new();
        registry.register(CardDefinition::new(CardId::new(1), "Llanowar Elves").with_type("Creature"));
        registry.register(CardDefinition::new(CardId::new(2), "Forest").with_type("Land"));
        registry.register(CardDefinition::new(CardId::new(3), "Fire /// Ice").with_type("Instant"));
        registry.register(CardDefinition::new(CardId::new(4), "Fire").with_type("Instant"));
        registry.register(CardDefinition::new(CardId::new(5), "Elvish Mystic").with_type("Creature"));
        registry
    }

    #[test]
    fn test_group_by_type() {
        let counts: CardCounts = [2, 1, 2, 5, 99]
            .into_iter()
            .map(CardId::new)
            .collect();
        let groups = group_by_type(&counts, &registry());

        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].card_type, CardType::Creature);
        assert_eq!(
            groups[0].cards,
            vec![("Elvish Mystic".to_owned(), 1), ("Llanowar Elves".to_owned(), 1)]
        );
        assert_eq!(groups[1].card_type, CardType::Land);
        assert_eq!(groups[1].total(), 2);
        assert_eq!(groups[2].card_type, CardType::Other);
        assert_eq!(groups[2].cards, vec![("Unknown card #99".to_owned(), 1)]);
    }

    #[test]
    fn test_split_halves_fold() {
        let counts: CardCounts = [3, 4].into_iter().map(CardId::new).collect();
        let groups = group_by_type(&counts, &registry());

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].cards, vec![("Fire /// Ice".to_owned(), 2)]);
    }

    #[test]
    fn test_match_list() {
        let summaries = vec![MatchSummary {
            id: crate::core::MatchId::new("abcdef123456"),
            start: None,
            end: None,
            opponent_name: Some("Bob".to_owned()),
            completed: false,
        }];
        let text = MatchList(&summaries).to_string();
        assert_eq!(text, "  1. abcdef12  vs Bob  (in progress)\n");
    }
}
