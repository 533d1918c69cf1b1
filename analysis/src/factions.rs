//! Faction identification from build orders.
//!
//! The lobby metadata says "Random" for players who rolled the dice; the
//! commands give the answer away. Every roster name leads with its faction
//! word, so the first production or placement command that resolves through
//! the name tables names the faction the player was actually dealt.

use sage_replay::{CommandBody, GameTables, Log, ReplayBody};

/// Returns the faction word for `player_id`, or `None` when no command of
/// theirs resolves through the tables. Unresolved hex names never match, so
/// a sparse roster degrades to `None` rather than a wrong answer.
pub fn resolve_faction(body: &ReplayBody, tables: &GameTables, player_id: i32) -> Option<String> {
    for command in body.commands() {
        if command.player_id != player_id {
            continue;
        }

        let (id, name) = match &command.body {
            CommandBody::Queue { unit, unit_name, .. } => (*unit, unit_name),
            CommandBody::PlaceStructure { building, name, .. } => (*building, name),
            _ => continue,
        };

        if tables.units.contains_key(&id) {
            return name.split_whitespace().next().map(str::to_string);
        }
    }

    tracing::trace!(target: Log::Analysis, player_id, "No faction-revealing command");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use sage_replay::{Chunk, ChunkKind, Command, GameVariant, ParseStats, UnitCost, UnitId};

    const PREDATOR: UnitId = 0x9E24_A3B1;
    const UNKNOWN: UnitId = 0x0000_002A;

    fn body_of(commands: Vec<Command>) -> ReplayBody {
        ReplayBody {
            chunks: vec![Chunk {
                time_code: 0,
                kind: ChunkKind::Commands,
                data: Vec::new(),
                commands,
            }],
            stats: ParseStats::default(),
        }
    }

    fn queue(player_id: i32, unit: UnitId, name: &str) -> Command {
        Command {
            time_code: 0,
            player_id,
            opcode: 0x2D,
            body: CommandBody::Queue {
                factory: 0x0601,
                unit,
                unit_name: name.to_string(),
                count: 1,
                cost: Some(UnitCost::Flat(1100)),
            },
        }
    }

    fn tables() -> GameTables {
        let mut tables = GameTables::bare(GameVariant::KanesWrath);
        tables.units.insert(PREDATOR, "GDI Predator Tank".into());
        tables
    }

    #[test]
    fn test_first_resolved_command_names_the_faction() {
        let body = body_of(vec![
            queue(0, UNKNOWN, "Unit 0x0000002A"), // unmapped, must not answer "Unit"
            queue(0, PREDATOR, "GDI Predator Tank"),
        ]);

        assert_eq!(resolve_faction(&body, &tables(), 0), Some("GDI".to_string()));
    }

    #[test]
    fn test_other_players_commands_are_ignored() {
        let body = body_of(vec![queue(1, PREDATOR, "GDI Predator Tank")]);

        assert_eq!(resolve_faction(&body, &tables(), 0), None);
        assert_eq!(resolve_faction(&body, &tables(), 1), Some("GDI".to_string()));
    }

    #[test]
    fn test_unresolvable_build_order_stays_unknown() {
        let body = body_of(vec![queue(0, UNKNOWN, "Unit 0x0000002A")]);

        assert_eq!(resolve_faction(&body, &tables(), 0), None);
    }
}
