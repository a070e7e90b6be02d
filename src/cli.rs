use std::env;
use std::path::PathBuf;

/// Default API port.
pub const DEFAULT_PORT: u16 = 3000;

/// Built-in table preset used when neither `--tables` nor `--preset` is given.
pub const DEFAULT_PRESET: &str = "chile_2024";

#[derive(Debug, Clone, PartialEq)]
pub struct CliOptions {
    pub tables: Option<PathBuf>,
    pub preset: Option<String>,
    pub household: Option<PathBuf>,
    pub region: Option<String>,
    pub rut: Option<String>,
    pub compare: Option<(String, String)>,
    pub hours: Option<f64>,
    pub price_delta: f64,
    pub savings: Option<f64>,
    pub csv_out: Option<PathBuf>,
    pub store: Option<PathBuf>,
    pub save: Option<String>,
    pub history: bool,
    pub serve: bool,
    pub port: u16,
    pub help: bool,
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(args)
}

pub fn parse_args_from(args: Vec<String>) -> Result<CliOptions, String> {
    let mut opts = CliOptions {
        tables: None,
        preset: None,
        household: None,
        region: None,
        rut: None,
        compare: None,
        hours: None,
        price_delta: 0.0,
        savings: None,
        csv_out: None,
        store: None,
        save: None,
        history: false,
        serve: false,
        port: DEFAULT_PORT,
        help: false,
    };
    let mut price_delta = None;
    let mut port = None;

    let mut i = 0usize;
    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--help" | "-h" => {
                opts.help = true;
                return Ok(opts);
            }
            "--history" => set_once(&mut opts.history, flag)?,
            "--serve" => set_once(&mut opts.serve, flag)?,
            _ => {
                i += 1;
                let value = args.next_or_err(i, flag)?;
                match flag {
                    "--tables" => replace_once(&mut opts.tables, PathBuf::from(value), flag)?,
                    "--preset" => replace_once(&mut opts.preset, value.to_string(), flag)?,
                    "--household" => {
                        replace_once(&mut opts.household, PathBuf::from(value), flag)?;
                    }
                    "--region" => replace_once(&mut opts.region, value.to_string(), flag)?,
                    "--rut" => replace_once(&mut opts.rut, value.to_string(), flag)?,
                    "--compare" => {
                        let pair = value
                            .split_once(',')
                            .map(|(a, b)| (a.trim().to_string(), b.trim().to_string()))
                            .filter(|(a, b)| !a.is_empty() && !b.is_empty())
                            .ok_or_else(|| {
                                format!("--compare value \"{value}\" must be two ids: <a>,<b>")
                            })?;
                        replace_once(&mut opts.compare, pair, flag)?;
                    }
                    "--hours" => replace_once(&mut opts.hours, parse_f64(value, flag)?, flag)?,
                    "--price-delta" => {
                        replace_once(&mut price_delta, parse_f64(value, flag)?, flag)?;
                    }
                    "--savings" => replace_once(&mut opts.savings, parse_f64(value, flag)?, flag)?,
                    "--csv-out" => replace_once(&mut opts.csv_out, PathBuf::from(value), flag)?,
                    "--store" => replace_once(&mut opts.store, PathBuf::from(value), flag)?,
                    "--save" => replace_once(&mut opts.save, value.to_string(), flag)?,
                    "--port" => {
                        let p = value
                            .parse::<u16>()
                            .map_err(|_| format!("--port value \"{value}\" is not a valid u16"))?;
                        replace_once(&mut port, p, flag)?;
                    }
                    other => return Err(format!("unknown argument: {other}")),
                }
            }
        }
        i += 1;
    }

    if opts.tables.is_some() && opts.preset.is_some() {
        return Err(
            "arguments `--tables` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }
    if opts.tables.is_none() && opts.preset.is_none() {
        opts.preset = Some(DEFAULT_PRESET.to_string());
    }
    if opts.compare.is_none() && (opts.hours.is_some() || price_delta.is_some()) {
        return Err("`--hours` and `--price-delta` require `--compare`".to_string());
    }
    if (opts.save.is_some() || opts.history) && opts.store.is_none() {
        return Err("`--save` and `--history` require `--store <path>`".to_string());
    }
    if opts.save.is_some() && opts.household.is_none() {
        return Err("`--save` requires `--household <path>`".to_string());
    }
    if port.is_some() && !opts.serve {
        return Err("`--port` requires `--serve`".to_string());
    }
    if opts.household.is_none() && opts.compare.is_none() && !opts.history && !opts.serve {
        return Err("nothing to do: pass `--household <path>` (see --help)".to_string());
    }

    opts.price_delta = price_delta.unwrap_or(0.0);
    opts.port = port.unwrap_or(DEFAULT_PORT);
    Ok(opts)
}

fn set_once(slot: &mut bool, flag: &str) -> Result<(), String> {
    if std::mem::replace(slot, true) {
        return Err(format!("{flag} provided more than once"));
    }
    Ok(())
}

fn replace_once<T>(slot: &mut Option<T>, value: T, flag: &str) -> Result<(), String> {
    if slot.replace(value).is_some() {
        return Err(format!("{flag} provided more than once"));
    }
    Ok(())
}

fn parse_f64(value: &str, flag: &str) -> Result<f64, String> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("{flag} value \"{value}\" is not a valid number"))
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, flag: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, flag: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| format!("missing value for {flag}"))
    }
}

pub fn print_usage() {
    eprintln!("mi-energia: household electricity consumption, cost and emissions");
    eprintln!();
    eprintln!("Usage: mi-energia [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --tables <path>          Load tariff/catalog tables from a TOML file");
    eprintln!("  --preset <name>          Use built-in tables (default: chile_2024)");
    eprintln!("  --household <path>       Household TOML file to estimate");
    eprintln!("  --region <code>          Override the household's region (RM, V, VIII, ...)");
    eprintln!("  --rut <rut>              Owner RUT for --save/--history");
    eprintln!("  --compare <a>,<b>        Compare two catalog appliances");
    eprintln!("  --hours <h>              Daily hours for --compare (default from tables)");
    eprintln!("  --price-delta <clp>      Extra up-front price of <b> over <a>");
    eprintln!("  --savings <pct>          Project savings for a % reduction");
    eprintln!("  --csv-out <path>         Export the ranking to CSV");
    eprintln!("  --store <path>           Local JSON scenario store");
    eprintln!("  --save <name>            Save the estimate as a named scenario");
    eprintln!("  --history                List saved scenarios for the owner");
    eprintln!("  --serve                  Start the REST API (requires the `api` feature)");
    eprintln!("  --port <u16>             API server port (default: 3000)");
    eprintln!("  --help                   Show this help message");
}
