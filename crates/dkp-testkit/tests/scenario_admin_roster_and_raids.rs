//! Scenario: roster and raid maintenance
//!
//! Players and characters are added with ownership checks, renames carry
//! attendance along, deletion is refused for players with attendance, and
//! raids are registered from a report's admin view (upsert by date).

use dkp_report::ReportError;
use dkp_testkit::{player, raid, season, ymd, Harness, ScriptedReportSource};

fn harness(reports: ScriptedReportSource) -> Harness {
    let h = Harness::new(reports).unwrap();
    h.seed(
        &[season(1, "S1", ymd(2024, 9, 1))],
        &[
            player(1, "Olli", &["Moppi-Blackrock"]),
            player(2, "Zelma", &["Zelma-Blackrock"]),
        ],
        &[raid(1, ymd(2024, 9, 10), &["Olli"])],
    )
    .unwrap();
    h
}

#[test]
fn scenario_players_and_characters() {
    let h = harness(ScriptedReportSource::new());

    let kim = h.service.add_player(" Kim ", ["Kimi-Antonidas"]).unwrap();
    assert_eq!((kim.id, kim.name.as_str()), (3, "Kim"));

    let err = h.service.add_player("Kim", Vec::<String>::new()).unwrap_err();
    assert!(err.is_validation(), "{err}");

    let err = h.service.add_character("Kim", "Moppi-Blackrock").unwrap_err();
    assert_eq!(err.to_string(), "character Moppi-Blackrock already belongs to Olli");

    let err = h.service.add_character("Nobody", "Fresh-Blackrock").unwrap_err();
    assert!(err.is_not_found());

    let zelma = h.service.add_character("Zelma", "Zelmadin-Blackrock").unwrap();
    assert_eq!(zelma.characters.len(), 2);

    // The cache was dropped by the write; the roster is current.
    let data = h.service.data().unwrap();
    assert_eq!(data.roster.player_for_character("Zelmadin-Blackrock").unwrap().name, "Zelma");
    assert_eq!(data.roster.len(), 3);
}

#[test]
fn scenario_rename_keeps_balance_and_delete_needs_no_attendance() {
    let h = harness(ScriptedReportSource::new());
    let before = h.service.balance_view("S1").unwrap();
    let olli = before.balances.iter().find(|b| b.name == "Olli").unwrap().clone();

    h.service.rename_player("Olli", "Oliver").unwrap();
    let after = h.service.balance_view("S1").unwrap();
    let oliver = after.balances.iter().find(|b| b.name == "Oliver").unwrap();
    assert_eq!((oliver.value, oliver.income), (olli.value, olli.income));
    assert!(h.service.data().unwrap().raids[0].attended_by("Oliver"));

    let err = h.service.delete_player("Oliver").unwrap_err();
    assert!(err.is_validation(), "{err}");

    let removed = h.service.delete_player("Zelma").unwrap();
    assert_eq!(removed.id, 2);
    assert!(h.service.data().unwrap().roster.player_by_name("Zelma").is_none());
}

#[test]
fn scenario_register_raid_from_report() {
    let reports = ScriptedReportSource::new()
        .with_report("newRaid", ymd(2024, 9, 17), &["Moppi-Blackrock", "Zelma-Blackrock"])
        .with_report("redo", ymd(2024, 9, 10), &["Zelma-Blackrock"])
        .with_report("pug", ymd(2024, 9, 24), &["Moppi-Blackrock", "Pug-Antonidas"])
        .with_failure("broken", ReportError::Api { message: "rate limited".to_string() });
    let h = harness(reports);

    let view = h.service.admin_view("newRaid").unwrap();
    assert_eq!(view.player_list, vec!["Olli", "Zelma"]);
    assert_eq!(view.report_url, "https://www.warcraftlogs.com/reports/newRaid");
    let registered = h.service.register_raid(&view).unwrap();
    assert_eq!(registered.id, 2);

    // Same date again replaces the raid in place.
    let redo = h.service.admin_view("redo").unwrap();
    let replaced = h.service.register_raid(&redo).unwrap();
    assert_eq!(replaced.id, 1);
    assert_eq!(replaced.report_id, "redo");
    let raids = h.service.data().unwrap().raids.clone();
    assert_eq!(raids.len(), 2);
    assert!(!raids.iter().find(|r| r.id == 1).unwrap().attended_by("Olli"));

    let pug = h.service.admin_view("pug").unwrap();
    assert_eq!(pug.validations, vec!["unknown character: Pug-Antonidas"]);
    assert!(h.service.register_raid(&pug).unwrap_err().is_validation());

    assert!(h.service.admin_view("missing").unwrap_err().is_not_found());
    let err = h.service.admin_view("broken").unwrap_err();
    assert!(!err.is_not_found() && !err.is_conflict());

    assert_eq!(h.reports.calls(), vec!["newRaid", "redo", "pug", "missing", "broken"]);
}

#[test]
fn scenario_seasons_are_listed_current_first() {
    let h = harness(ScriptedReportSource::new());
    h.service.add_season("S2", "second half", ymd(2025, 1, 1)).unwrap();
    assert!(h.service.add_season("S2", "", ymd(2025, 2, 1)).unwrap_err().is_validation());

    let names: Vec<String> = h.service.seasons().unwrap().into_iter().map(|s| s.name).collect();
    assert_eq!(names, vec!["S2", "S1"]);
    assert_eq!(h.service.current_season().unwrap().name, "S2");

    // The September raid stays in S1.
    let s2 = h.service.balance_view("S2").unwrap();
    assert!(s2.balances.iter().all(|b| b.income == 100));
}

#[test]
fn scenario_report_links_follow_configured_base() {
    let reports = ScriptedReportSource::new().with_report("newRaid", ymd(2024, 9, 17), &["Moppi-Blackrock"]);
    let h = Harness::with_config(&["report:\n  report_url_base: \"https://logs.example.test/r/\"\n"], reports).unwrap();
    h.seed(
        &[season(1, "S1", ymd(2024, 9, 1))],
        &[player(1, "Olli", &["Moppi-Blackrock"])],
        &[raid(1, ymd(2024, 9, 10), &["Olli"])],
    )
    .unwrap();

    let view = h.service.admin_view("newRaid").unwrap();
    assert_eq!(view.report_url, "https://logs.example.test/r/newRaid");

    let stored = h.service.data().unwrap().raids[0].clone();
    assert_eq!(
        h.service.report_url(&stored).as_deref(),
        Some("https://logs.example.test/r/report1")
    );
}
