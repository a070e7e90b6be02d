//! Household editing, scenario persistence and export end to end.

mod common;

use mi_energia::calc::{EntryUpdate, project_savings};
use mi_energia::catalog::RegionCode;
use mi_energia::io::export::{write_history_csv, write_ranking_csv};
use mi_energia::report::EstimateReport;
use mi_energia::scenario::{
    JsonFileStore, MemoryStore, RemoteStatus, ScenarioStore, ScenarioSync,
};

use common::{empty_household, march, other_owner, owner, santiago_household, tables};

#[test]
fn sample_household_totals_and_ranking() {
    let tables = tables();
    let household = santiago_household(&tables);
    let totals = household.totals();
    assert!((totals.kwh - common::SANTIAGO_KWH).abs() < 1e-9);
    assert!((totals.cost - common::SANTIAGO_KWH * 195.0).abs() < 1e-6);

    let ranked = household.ranked();
    let keys: Vec<&str> = ranked.iter().map(|r| r.entry.key()).collect();
    assert_eq!(
        keys,
        ["refrigerator", "washing_machine", "tv", "microwave", "led_bulb", "router"]
    );
    // ranking never reorders the household itself
    assert_eq!(household.entries()[1].key(), "led_bulb");
}

#[test]
fn every_mutation_returns_fresh_totals() {
    let tables = tables();
    let mut household = empty_household(&tables, RegionCode::Valparaiso);
    assert_eq!(household.totals().kwh, 0.0);

    let after_add = household
        .add_from_catalog(&tables, "kettle", None, 0.5, 1)
        .expect("known appliance");
    assert!((after_add.kwh - 30.0).abs() < 1e-9);

    let after_update = household
        .update(
            0,
            EntryUpdate {
                hours_per_day: Some(0.25),
                ..EntryUpdate::default()
            },
        )
        .expect("valid update");
    assert!((after_update.kwh - 15.0).abs() < 1e-9);

    let rejected = household.update(
        0,
        EntryUpdate {
            hours_per_day: Some(30.0),
            quantity: Some(3),
            ..EntryUpdate::default()
        },
    );
    assert!(rejected.is_err());
    // failed update leaves the entry as it was
    assert_eq!(household.entries()[0].quantity(), 1);
    assert_eq!(household.totals(), after_update);

    let (_, after_remove) = household.remove(0).expect("index in range");
    assert_eq!(after_remove.kwh, 0.0);
}

#[test]
fn breakdown_shares_sum_to_hundred() {
    let tables = tables();
    let household = santiago_household(&tables);
    let all = household.breakdown(household.entries().len());
    let total_share: f64 = all.iter().map(|b| b.share_pct).sum();
    assert!((total_share - 100.0).abs() < 1e-9);
    assert_eq!(all[0].relative_to_max, 1.0);

    let top3 = household.breakdown(3);
    assert_eq!(top3.len(), 3);
}

#[test]
fn savings_projection_for_sample_household() {
    let tables = tables();
    let household = santiago_household(&tables);
    let monthly = household.totals();
    let p = project_savings(monthly.kwh, 195.0, 10.0, &tables.savings_measures)
        .expect("valid percentage");
    assert!((p.annual - p.monthly * 12.0).abs() < 1e-9);
    assert_eq!(
        p.recommended.as_ref().map(|m| m.percentage),
        Some(10.0)
    );
    assert!(p.payback_months.is_some());
}

#[test]
fn json_store_keeps_history_across_reopen() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("nested").join("scenarios.json");
    let tables = tables();
    let household = santiago_household(&tables);

    {
        let mut store = JsonFileStore::new(&path);
        for day in 1..=3 {
            store
                .save(&owner(), &household.snapshot(format!("dia {day}"), march(day)))
                .expect("local save");
        }
        store
            .save(&other_owner(), &household.snapshot("ajeno", march(4)))
            .expect("local save");
    }

    let store = JsonFileStore::new(&path);
    let mine = store.list(&owner(), tables.history_limit).expect("list");
    let names: Vec<&str> = mine.iter().map(|d| d.scenario.name.as_str()).collect();
    assert_eq!(names, ["dia 3", "dia 2", "dia 1"]);
    assert_eq!(store.list(&owner(), 2).map(|v| v.len()).ok(), Some(2));

    let avg = store
        .regional_average_kwh(RegionCode::Metropolitana)
        .expect("readable");
    assert!((avg.unwrap_or_default() - common::SANTIAGO_KWH).abs() < 1e-9);
}

#[test]
fn remote_failure_does_not_block_local_save() {
    let dir = tempfile::tempdir().expect("temp dir");
    let mut remote = MemoryStore::with_seed(3);
    remote.set_available(false);

    let mut sync = ScenarioSync::new(JsonFileStore::new(dir.path().join("s.json")), Some(remote));
    let tables = tables();
    let scenario = santiago_household(&tables).snapshot("marzo", march(10));

    let report = sync.save(&owner(), &scenario).expect("local save succeeds");
    assert!(matches!(report.remote, RemoteStatus::Failed(_)));
    assert_eq!(report.local.scenario, scenario);
    assert_eq!(sync.list(&owner(), 10).map(|v| v.len()).ok(), Some(1));
    assert_eq!(sync.regional_average_kwh(RegionCode::Metropolitana), None);
}

#[test]
fn report_and_csv_exports_agree() {
    let tables = tables();
    let household = santiago_household(&tables);
    let report = EstimateReport::from_household(&household);

    let mut ranking = Vec::new();
    write_ranking_csv(&report.ranked, &mut ranking).expect("write to Vec");
    let mut rdr = csv::Reader::from_reader(ranking.as_slice());
    let rows: Vec<csv::StringRecord> = rdr.records().filter_map(Result::ok).collect();
    assert_eq!(rows.len(), 6);
    assert_eq!(rows[0].get(1), Some("refrigerator"));
    assert_eq!(rows[0].get(8), Some("High"));

    let mut store = MemoryStore::with_seed(9);
    store
        .save(&owner(), &household.snapshot("marzo", march(1)))
        .expect("save");
    let history = store.list(&owner(), 10).expect("list");
    let mut out = Vec::new();
    write_history_csv(&history, &mut out).expect("write to Vec");
    let text = String::from_utf8(out).expect("utf-8");
    assert!(text.lines().nth(1).is_some_and(|l| l.contains(",marzo,RM,")));
}
