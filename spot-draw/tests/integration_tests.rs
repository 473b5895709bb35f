// Integration tests for spot draw.
//
// These exercise the library's public API end to end: claim resolution,
// the random fill, the assignment lifecycle, CSV export, and the
// orchestrator loop driven over channels the way the TUI drives it.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::mpsc;

use spot_draw::app::{self, AppState};
use spot_draw::config::{Config, DrawConfig};
use spot_draw::draw::claims::compute_claims;
use spot_draw::draw::participant::{parse_spot_expression, ParticipantDraft, ParticipantId};
use spot_draw::draw::session::{Session, SessionError};
use spot_draw::export;
use spot_draw::protocol::{NoticeLevel, UiUpdate, UserCommand};

// ===========================================================================
// Test helpers
// ===========================================================================

fn add(session: &mut Session, name: &str, fixed: &str, random: u32) -> ParticipantId {
    session
        .add_participant(&ParticipantDraft::new(name, fixed, random.to_string()))
        .expect("valid participant")
        .id
}

/// Spots held by `name` in the authoritative mapping.
fn spots_of(session: &Session, name: &str) -> BTreeSet<u32> {
    session
        .authoritative_mapping()
        .iter()
        .filter(|(_, n)| n.as_str() == name)
        .map(|(spot, _)| *spot)
        .collect()
}

fn test_config(total_spots: u32, seed: u64, dir: &str) -> Config {
    let mut config = Config {
        draw: DrawConfig {
            total_spots,
            seed: Some(seed),
        },
        ..Config::default()
    };
    config.export.directory = Some(std::env::temp_dir().join(dir));
    config
}

// ===========================================================================
// Fixed-spot parsing
// ===========================================================================

#[test]
fn parse_examples() {
    assert_eq!(parse_spot_expression("1,3,5-8", 8).spots, vec![1, 3, 5, 6, 7, 8]);
    assert_eq!(parse_spot_expression("10-10", 10).spots, vec![10]);
    assert_eq!(parse_spot_expression("abc, 2", 10).spots, vec![2]);
}

#[test]
fn huge_ranges_from_the_form_are_dropped_not_fatal() {
    let mut session = Session::new(10).unwrap();
    let added = session
        .add_participant(&ParticipantDraft::new(
            "Ada",
            "1-18446744073709551615, 5-18446744073709551615",
            "0",
        ))
        .unwrap();
    assert_eq!(added.out_of_range, u64::MAX);
    assert_eq!(
        session.participant(added.id).unwrap().fixed_spots,
        (1..=10).collect::<Vec<_>>()
    );
}

#[test]
fn oversized_total_is_rejected_and_session_kept() {
    let mut state = AppState::new(test_config(10, 1, "spot_draw_integration_total")).unwrap();
    let notice = state
        .handle_command(UserCommand::SetTotalSpots("4000000000".into()))
        .unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(state.session.total_spots(), 10);
    assert_eq!(state.build_snapshot().spots.len(), 10);
}

// ===========================================================================
// Conflict detection
// ===========================================================================

#[test]
fn disjoint_fixed_claims_have_no_conflicts() {
    let mut session = Session::new(20).unwrap();
    add(&mut session, "Ada", "1-3", 0);
    add(&mut session, "Bo", "4 7", 0);
    add(&mut session, "Cy", "20, 25", 0);

    let claims = session.claims();
    assert!(claims.is_valid());
    let claimed: Vec<u32> = claims.mapping.keys().copied().collect();
    assert_eq!(claimed, vec![1, 2, 3, 4, 7, 20]);
}

#[test]
fn one_conflict_per_pair_per_spot_first_is_earlier() {
    let mut session = Session::new(10).unwrap();
    add(&mut session, "Ada", "2,3", 0);
    add(&mut session, "Bo", "3", 0);
    add(&mut session, "Cy", "2-3", 0);

    let claims = session.claims();
    let seen: Vec<(u32, &str, &str)> = claims
        .conflicts
        .iter()
        .map(|c| (c.spot, c.first.as_str(), c.later.as_str()))
        .collect();
    assert_eq!(
        seen,
        vec![(3, "Ada", "Bo"), (2, "Ada", "Cy"), (3, "Ada", "Cy")]
    );
    // First-come claims win in the fixed-only mapping.
    assert_eq!(claims.mapping[&2], "Ada");
    assert_eq!(claims.mapping[&3], "Ada");
}

#[test]
fn claims_recompute_from_participants_only() {
    let mut session = Session::new(10).unwrap();
    add(&mut session, "Ada", "4", 0);
    let late = add(&mut session, "Bo", "4", 0);
    assert_eq!(session.claims().conflicts.len(), 1);

    session.remove_participant(late).unwrap();
    assert!(session.claims().is_valid());
    assert_eq!(
        session.claims(),
        compute_claims(session.participants(), session.total_spots())
    );
}

// ===========================================================================
// Random fill
// ===========================================================================

#[test]
fn assignment_uniqueness_and_grant_count_hold_across_seeds() {
    for seed in 0..50u64 {
        let mut session = Session::new(12).unwrap();
        let a = add(&mut session, "Ada", "1, 5", 4);
        let b = add(&mut session, "Bo", "12", 3);
        let c = add(&mut session, "Cy", "", 6);

        let mut rng = StdRng::seed_from_u64(seed);
        let assignment = session.assign_randoms(&mut rng).unwrap().clone();

        // 9 free spots, 13 requested
        assert_eq!(assignment.granted, 9);
        assert_eq!(assignment.requested, 13);

        let mut all = BTreeSet::new();
        for id in [a, b, c] {
            for spot in assignment.random_for(id) {
                assert!(all.insert(*spot), "spot {spot} granted twice (seed {seed})");
                assert!(![1, 5, 12].contains(spot));
            }
        }
        assert_eq!(all.len(), 9);
        assert_eq!(assignment.mapping.len(), 12);
        // Insertion order gets served first.
        assert_eq!(assignment.random_for(a).len(), 4);
        assert_eq!(assignment.random_for(b).len(), 3);
        assert_eq!(assignment.random_for(c).len(), 2);
    }
}

#[test]
fn reassigning_keeps_fixed_claims() {
    let mut session = Session::new(30).unwrap();
    add(&mut session, "Ada", "1-4", 5);
    add(&mut session, "Bo", "30", 5);
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..2 {
        session.assign_randoms(&mut rng).unwrap();
        let ada = spots_of(&session, "Ada");
        let bo = spots_of(&session, "Bo");
        assert!(ada.is_disjoint(&bo));
        assert!((1..=4).all(|s| ada.contains(&s)));
        assert!(bo.contains(&30));
        assert_eq!(ada.len(), 9);
        assert_eq!(bo.len(), 6);
    }
}

// ===========================================================================
// Lifecycle and export
// ===========================================================================

#[test]
fn reset_restores_fixed_only_export() {
    let mut session = Session::new(6).unwrap();
    add(&mut session, "Ada", "2", 2);
    add(&mut session, "Bo", "5", 1);
    let before = session.export_csv().unwrap();
    let participants_before = session.participants().to_vec();

    session
        .assign_randoms(&mut StdRng::seed_from_u64(3))
        .unwrap();
    assert_ne!(session.export_csv().unwrap(), before);

    assert!(session.reset_randoms());
    assert!(!session.is_assigned());
    assert_eq!(session.participants(), participants_before.as_slice());
    assert_eq!(session.export_csv().unwrap(), before);
    assert_eq!(before, "Spot #,Name\n1,\n2,Ada\n3,\n4,\n5,Bo\n6,\n");
}

#[test]
fn mutations_invalidate_assignment() {
    let mut session = Session::new(10).unwrap();
    add(&mut session, "Ada", "", 3);
    let mut rng = StdRng::seed_from_u64(1);

    session.assign_randoms(&mut rng).unwrap();
    add(&mut session, "Bo", "", 1);
    assert!(!session.is_assigned());

    session.assign_randoms(&mut rng).unwrap();
    session.set_total_spots(12).unwrap();
    assert!(!session.is_assigned());
}

#[test]
fn conflicting_assignment_is_rejected_without_state_change() {
    let mut session = Session::new(5).unwrap();
    add(&mut session, "Ada", "1", 1);
    add(&mut session, "Bo", "1", 1);

    let err = session
        .assign_randoms(&mut StdRng::seed_from_u64(0))
        .unwrap_err();
    assert!(matches!(err, SessionError::Conflicts(1)));
    assert!(!session.is_assigned());
}

#[test]
fn end_to_end_scenario() {
    let mut session = Session::new(5).unwrap();
    add(&mut session, "P1", "1,2", 0);
    let p2 = add(&mut session, "P2", "2", 1);

    let conflicts = session.claims().conflicts;
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].spot, 2);
    assert_eq!(conflicts[0].first, "P1");
    assert_eq!(conflicts[0].later, "P2");
    let mut rng = StdRng::seed_from_u64(99);
    assert!(session.assign_randoms(&mut rng).is_err());

    session.remove_participant(p2).unwrap();
    let p2 = add(&mut session, "P2", "", 1);
    assert!(session.claims().is_valid());

    let granted = session.assign_randoms(&mut rng).unwrap().random_for(p2).to_vec();
    assert_eq!(granted.len(), 1);
    assert!([3, 4, 5].contains(&granted[0]));

    let csv = session.export_csv().unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 6);
    assert_eq!(&lines[..3], &["Spot #,Name", "1,P1", "2,P1"]);
    for spot in 3..=5u32 {
        let expected = if spot == granted[0] {
            format!("{spot},P2")
        } else {
            format!("{spot},")
        };
        assert_eq!(lines[spot as usize], expected);
    }
}

#[test]
fn export_quotes_names() {
    let mut session = Session::new(3).unwrap();
    add(&mut session, "Smith, Jo", "1", 0);
    add(&mut session, "The \"Ace\"", "3", 0);
    assert_eq!(
        session.export_csv().unwrap(),
        "Spot #,Name\n1,\"Smith, Jo\"\n2,\n3,\"The \"\"Ace\"\"\"\n"
    );
}

// ===========================================================================
// Orchestrator over channels
// ===========================================================================

#[tokio::test]
async fn orchestrator_assigns_and_exports() {
    let config = test_config(5, 11, "spot_draw_integration_export");
    let export_dir = config.export_dir();
    let _ = std::fs::remove_dir_all(&export_dir);

    let state = AppState::new(config).unwrap();
    let (cmd_tx, cmd_rx) = mpsc::channel(16);
    let (ui_tx, mut ui_rx) = mpsc::channel(64);
    let handle = tokio::spawn(app::run(cmd_rx, ui_tx, state));

    for cmd in [
        UserCommand::AddParticipant(ParticipantDraft::new("P1", "1,2", "0")),
        UserCommand::AddParticipant(ParticipantDraft::new("P2", "", "1")),
        UserCommand::AssignRandoms,
        UserCommand::Export,
        UserCommand::Quit,
    ] {
        cmd_tx.send(cmd).await.unwrap();
    }
    handle.await.unwrap().unwrap();

    let mut notices = Vec::new();
    let mut last_snapshot = None;
    while let Ok(update) = ui_rx.try_recv() {
        match update {
            UiUpdate::Notice(n) => notices.push(n),
            UiUpdate::Snapshot(s) => last_snapshot = Some(s),
        }
    }

    assert!(notices.iter().all(|n| n.level == NoticeLevel::Info));
    let snapshot = last_snapshot.expect("at least one snapshot");
    assert!(snapshot.summary.assigned);
    assert_eq!(snapshot.summary.random_granted, 1);

    let path = export_dir.join(export::file_name(5));
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("Spot #,Name\n1,P1\n2,P1\n"));
    assert_eq!(written.matches(",P2\n").count(), 1);

    let _ = std::fs::remove_dir_all(&export_dir);
}
