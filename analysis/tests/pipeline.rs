//! End-to-end runs over hand-built replay bytes: chunk stream in, analysis
//! reports out, with the real variant tables in between.

use sage_analysis::{resolve_faction, ApmAnalyzer, ResourceAnalyzer};
use sage_replay::{CommandBody, GameVariant, Position, ReplayBody, END_OF_REPLAY};
use sage_tables::tables_for;

const GDI_SLOT: u8 = 0x18; // player 0 under the Tiberium slot bias
const NOD_SLOT: u8 = 0x20; // player 1
const OBSERVER_SLOT: u8 = 0x10; // resolves to player -1

const GDI_REFINERY: u32 = 0xC2E5_1069;
const GDI_PREDATOR: u32 = 0x9E24_A3B1;
const NOD_SCORPION: u32 = 0x60B3_2944;
const ORBITAL_STRIKE: u32 = 0x41C2_11B1;
const POWER_PACKS: u32 = 0x74F5_2B69;

const SOVIET_HAMMER: u32 = 0x7A60_AD97;
const IRON_CURTAIN: u32 = 0x8526_AAC4;

fn push_chunk(stream: &mut Vec<u8>, time_code: u32, kind: u8, data: &[u8]) {
    stream.extend_from_slice(&time_code.to_le_bytes());
    stream.push(kind);
    stream.extend_from_slice(&(data.len() as u32).to_le_bytes());
    stream.extend_from_slice(data);
    stream.extend_from_slice(&[0; 4]);
}

fn push_end(stream: &mut Vec<u8>) {
    stream.extend_from_slice(&END_OF_REPLAY.to_le_bytes());
}

fn command_chunk_data(records: &[Vec<u8>]) -> Vec<u8> {
    let mut data = vec![1u8];
    data.extend_from_slice(&(records.len() as u32).to_le_bytes());
    for record in records {
        data.extend_from_slice(record);
    }
    data
}

/// TW/KW production queue: 23-byte body with the factory and unit ids at
/// their known offsets, multiplier byte near the end.
fn queue_record(slot: u8, factory: u32, unit: u32, multi: u8) -> Vec<u8> {
    let mut body = vec![0u8; 23];
    body[1..5].copy_from_slice(&factory.to_le_bytes());
    body[8..12].copy_from_slice(&unit.to_le_bytes());
    body[17] = multi;

    let mut record = vec![0x2D, slot];
    record.extend_from_slice(&body);
    record.push(0xFF);
    record
}

fn skill_record(slot: u8, power: u32) -> Vec<u8> {
    let mut record = vec![0x26, slot];
    record.extend_from_slice(&power.to_le_bytes());
    record.extend_from_slice(&[0; 5]);
    record.push(0xFF);
    record
}

fn upgrade_record(slot: u8, upgrade: u32) -> Vec<u8> {
    let mut record = vec![0x2B, slot, 0x00];
    record.extend_from_slice(&upgrade.to_le_bytes());
    record.extend_from_slice(&[0; 9]);
    record.push(0xFF);
    record
}

fn placedown_record(slot: u8, building: u32) -> Vec<u8> {
    // Count byte of zero: no substructures, body is head and tail only.
    let mut body = vec![0u8; 13];
    body[6..10].copy_from_slice(&building.to_le_bytes());

    let mut record = vec![0x31, slot];
    record.extend_from_slice(&body);
    record.push(0xFF);
    record
}

fn gg_record(slot: u8, target: u8) -> Vec<u8> {
    vec![0x91, slot, 0x01, target, 0xFF]
}

/// The periodic 0x61 bookkeeping record; framed, never decoded.
fn heartbeat_record(slot: u8) -> Vec<u8> {
    let mut record = vec![0x61, slot];
    record.extend_from_slice(&[0; 6]);
    record.push(0xFF);
    record
}

fn queue_ra3_record(slot: u8, factory: u32, unit: u32, multi: u8) -> Vec<u8> {
    let mut body = vec![0u8; 12];
    body[1..5].copy_from_slice(&factory.to_le_bytes());
    body[6..10].copy_from_slice(&unit.to_le_bytes());
    body[11] = multi;

    let mut record = vec![0x28, slot];
    record.extend_from_slice(&body);
    record.push(0xFF);
    record
}

fn science_record(slot: u8, science: u32) -> Vec<u8> {
    let mut body = vec![0u8; 8];
    body[1..5].copy_from_slice(&science.to_le_bytes());

    let mut record = vec![0x5F, slot];
    record.extend_from_slice(&body);
    record.push(0xFF);
    record
}

fn deploy_record(slot: u8) -> Vec<u8> {
    let mut body = vec![0u8; 23];
    body[6..10].copy_from_slice(&100.0f32.to_le_bytes());
    body[10..14].copy_from_slice(&200.0f32.to_le_bytes());
    body[19..23].copy_from_slice(&1.5f32.to_le_bytes());

    let mut record = vec![0x21, slot];
    record.extend_from_slice(&body);
    record.push(0xFF);
    record
}

#[test]
fn test_kanes_wrath_replay_to_reports() {
    let tables = tables_for(GameVariant::KanesWrath);

    let mut stream = Vec::new();
    push_chunk(
        &mut stream,
        0,
        1,
        &command_chunk_data(&[
            placedown_record(GDI_SLOT, GDI_REFINERY),
            heartbeat_record(OBSERVER_SLOT),
        ]),
    );
    push_chunk(
        &mut stream,
        75,
        1,
        &command_chunk_data(&[queue_record(GDI_SLOT, 0x1201, GDI_PREDATOR, 0)]),
    );
    push_chunk(
        &mut stream,
        150,
        1,
        &command_chunk_data(&[skill_record(GDI_SLOT, ORBITAL_STRIKE)]),
    );
    push_chunk(
        &mut stream,
        300,
        1,
        &command_chunk_data(&[queue_record(NOD_SLOT, 0x1211, NOD_SCORPION, 0)]),
    );
    push_chunk(&mut stream, 450, 1, &command_chunk_data(&[gg_record(NOD_SLOT, GDI_SLOT)]));
    push_chunk(
        &mut stream,
        600,
        1,
        &command_chunk_data(&[upgrade_record(GDI_SLOT, POWER_PACKS)]),
    );
    push_chunk(&mut stream, 1000, 2, &[0; 8]);
    push_end(&mut stream);

    let mut body = ReplayBody::parse(&stream, &tables).expect("stream should parse cleanly");
    assert_eq!(body.stats.chunks, 7);
    assert_eq!(body.stats.command_chunks, 6);
    assert_eq!(body.stats.commands, 7);
    assert_eq!(body.stats.mismatched_chunks, 0);
    assert_eq!(body.end_time(), 1000);

    body.discard_invalid_players(2);
    assert_eq!(body.stats.dropped_commands, 1);
    assert_eq!(body.commands().count(), 6);

    let report = ResourceAnalyzer::new(&body, &tables, 2).calc().expect("costs are all on record");

    // Placedown at second 0, skill at 10, the predator delivery at 16
    // (75 + 171 build ticks = tick 246), the upgrade at 40.
    assert_eq!(report.spend[0], vec![(0, 3000), (10, 5500), (16, 6600), (40, 7100)]);
    // Nod's scorpion lands at tick 300 + 126 = 426.
    assert_eq!(report.spend[1], vec![(28, 800)]);

    assert_eq!(report.unit_counts[0]["GDI Harvester"], 1);
    assert_eq!(report.unit_counts[0]["GDI Predator Tank"], 1);
    assert_eq!(report.unit_counts[1]["Nod Scorpion Tank"], 1);

    assert_eq!(report.completions.len(), 2);
    assert_eq!(report.completions[0].time_code, 246);
    assert_eq!(report.completions[0].unit_name, "GDI Predator Tank");
    assert_eq!(report.completions[1].time_code, 426);
    assert_eq!(report.completions[1].player_id, 1);

    let apm = ApmAnalyzer::new(&body, 2).calc(10);
    assert_eq!(apm.average[0], 240.0 / 41.0);
    assert_eq!(apm.average[1], 120.0 / 41.0);
    assert_eq!(apm.peak[0], (10, 18.0));
    assert_eq!(apm.peak[1], (30, 12.0));

    assert_eq!(resolve_faction(&body, &tables, 0).as_deref(), Some("GDI"));
    assert_eq!(resolve_faction(&body, &tables, 1).as_deref(), Some("Nod"));
    assert_eq!(resolve_faction(&body, &tables, -1), None);
}

#[test]
fn test_red_alert_3_replay_to_reports() {
    let tables = tables_for(GameVariant::RedAlert3);
    // Slot 0x10 is player 0 under the RA3 bias.
    let slot = 0x10;

    let mut stream = Vec::new();
    push_chunk(&mut stream, 0, 1, &command_chunk_data(&[deploy_record(slot)]));
    push_chunk(
        &mut stream,
        30,
        1,
        &command_chunk_data(&[queue_ra3_record(slot, 0x2201, SOVIET_HAMMER, 0)]),
    );
    push_chunk(&mut stream, 60, 1, &command_chunk_data(&[science_record(slot, IRON_CURTAIN)]));
    push_chunk(&mut stream, 500, 2, &[0; 8]);
    push_end(&mut stream);

    let body = ReplayBody::parse(&stream, &tables).expect("stream should parse cleanly");
    assert_eq!(body.stats.commands, 3);

    let deploy = body.commands().next().expect("deploy decodes first");
    match &deploy.body {
        CommandBody::Deploy { at, orientation, .. } => {
            assert_eq!(*at, Position { x: 100.0, y: 200.0 });
            assert_eq!(*orientation, 1.5);
        },
        other => panic!("expected Deploy, got {other:?}"),
    }

    assert!(body
        .commands()
        .any(|command| matches!(&command.body, CommandBody::Science { name, .. } if name == "Iron Curtain")));

    let report = ResourceAnalyzer::new(&body, &tables, 1).calc().expect("costs are all on record");

    // 1000 credits is 156 build ticks; tick 30 + 156 lands in second 12.
    assert_eq!(report.spend[0], vec![(12, 1000)]);
    assert_eq!(report.unit_counts[0]["Soviet Hammer Tank"], 1);
    assert_eq!(report.completions.len(), 1);
    assert_eq!(report.completions[0].time_code, 186);

    assert_eq!(resolve_faction(&body, &tables, 0).as_deref(), Some("Soviet"));
}
