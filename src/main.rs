//! mi-energia entry point: CLI wiring over the table-driven calculator.

mod cli;

use std::process;

use chrono::Utc;
use log::debug;

use mi_energia::calc::{compare, project_savings};
use mi_energia::catalog::{CatalogProvider, RegionCode, TariffProvider};
use mi_energia::config::{Tables, TablesConfig};
use mi_energia::household::{Household, HouseholdFile};
use mi_energia::io::export::{export_ranking_csv, write_history_csv};
use mi_energia::report::{ComparisonSection, EstimateReport};
use mi_energia::rut::Rut;
use mi_energia::scenario::{JsonFileStore, MemoryStore, RemoteStatus, ScenarioSync};

use cli::CliOptions;

/// Region used to price a comparison when no household or `--region` is given.
const FALLBACK_REGION: RegionCode = RegionCode::Metropolitana;

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("error: {message}");
    process::exit(1);
}

fn load_tables(cli: &CliOptions) -> Tables {
    let config = if let Some(ref path) = cli.tables {
        TablesConfig::from_toml_file(path)
    } else {
        TablesConfig::from_preset(cli.preset.as_deref().unwrap_or(cli::DEFAULT_PRESET))
    };
    let config = config.unwrap_or_else(|e| fail(e));

    config.build().unwrap_or_else(|errors| {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    })
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = cli::parse_args().unwrap_or_else(|e| {
        eprintln!("error: {e}");
        cli::print_usage();
        process::exit(1);
    });
    if cli.help {
        cli::print_usage();
        return;
    }

    let tables = load_tables(&cli);
    debug!(
        "tables {} loaded: {} appliances, {} regions",
        tables.version,
        tables.catalog.len(),
        tables.tariffs.len()
    );

    let region_override = cli
        .region
        .as_deref()
        .map(|code| code.parse::<RegionCode>().unwrap_or_else(|e| fail(e)));

    let household_file = cli.household.as_deref().map(|path| {
        HouseholdFile::from_toml_file(path).unwrap_or_else(|e| fail(e))
    });
    let household: Option<Household> = household_file.as_ref().map(|file| {
        file.into_household(&tables, region_override)
            .unwrap_or_else(|e| fail(e))
    });

    let region = household
        .as_ref()
        .map(Household::region)
        .or(region_override)
        .unwrap_or(FALLBACK_REGION);
    let price = tables
        .tariff(region)
        .map(|t| t.cost_per_kwh)
        .unwrap_or_else(|e| fail(e));

    let comparison = cli.compare.as_ref().map(|(a, b)| {
        let hours = cli.hours.unwrap_or(tables.comparison.default_hours);
        let result = compare(&tables, a, b, hours, price, cli.price_delta)
            .unwrap_or_else(|e| fail(e));
        let name = |id: &str| {
            tables
                .appliance(id)
                .map(|d| d.name.clone())
                .unwrap_or_else(|_| id.to_string())
        };
        ComparisonSection {
            name_a: name(a),
            name_b: name(b),
            hours_per_day: hours,
            price_delta: cli.price_delta,
            result,
        }
    });

    if let Some(ref household) = household {
        let mut report = EstimateReport::from_household(household);
        if let Some(pct) = cli.savings {
            let projection = project_savings(
                report.monthly.kwh,
                report.cost_per_kwh,
                pct,
                &tables.savings_measures,
            )
            .unwrap_or_else(|e| fail(e));
            report = report.with_savings(projection);
        }
        if let Some(section) = comparison {
            report = report.with_comparison(section);
        }
        println!("{report}");

        if let Some(ref path) = cli.csv_out {
            if let Err(e) = export_ranking_csv(&report.ranked, path) {
                fail(format!("failed to write CSV: {e}"));
            }
            eprintln!("Ranking written to {}", path.display());
        }
    } else if let Some(section) = comparison {
        let c = &section.result;
        println!("{} vs {}", section.name_a, section.name_b);
        println!("Monthly saving: {:.2} CLP", c.monthly_saving);
        match c.recovery_months {
            Some(m) => println!("Recovery period: {m:.2} months"),
            None => println!("Recovery period: never (no saving)"),
        }
    }

    if let Some(ref store_path) = cli.store {
        let owner = owner_rut(&cli, household_file.as_ref());
        let mut sync: ScenarioSync<JsonFileStore, MemoryStore> =
            ScenarioSync::new(JsonFileStore::new(store_path.clone()), None);

        if let (Some(name), Some(household)) = (cli.save.as_deref(), household.as_ref()) {
            let scenario = household.snapshot(name, Utc::now());
            match sync.save(&owner, &scenario) {
                Ok(report) => {
                    eprintln!("Scenario \"{name}\" saved as {}", report.local.id);
                    if let RemoteStatus::Failed(e) = report.remote {
                        eprintln!("warning: remote sync failed: {e}");
                    }
                }
                Err(e) => fail(e),
            }
        }

        if cli.history {
            let history = sync
                .list(&owner, tables.history_limit)
                .unwrap_or_else(|e| fail(e));
            if let Err(e) = write_history_csv(&history, std::io::stdout()) {
                fail(e);
            }
        }
    }

    if cli.serve {
        serve(tables, cli.port);
    }
}

fn owner_rut(cli: &CliOptions, file: Option<&HouseholdFile>) -> Rut {
    let raw = cli
        .rut
        .as_deref()
        .or_else(|| file.and_then(|f| f.rut.as_deref()))
        .unwrap_or_else(|| fail("a RUT is required for --save/--history (use --rut)"));
    Rut::parse(raw).unwrap_or_else(|e| fail(e))
}

#[cfg(feature = "api")]
fn serve(tables: Tables, port: u16) {
    use std::net::SocketAddr;
    use std::sync::Arc;

    let state = Arc::new(mi_energia::api::AppState::new(tables, MemoryStore::new()));
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("error: failed to create tokio runtime: {e}");
        process::exit(1);
    });
    rt.block_on(mi_energia::api::serve(state, addr));
}

#[cfg(not(feature = "api"))]
fn serve(_tables: Tables, _port: u16) {
    fail("--serve requires building with `--features api`");
}
