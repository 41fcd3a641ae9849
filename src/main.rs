extern crate lectio;

extern crate ansi_term;
extern crate clap;
#[macro_use]
extern crate error_chain;

mod logging;

use std::fs::File;
use std::path::Path;

use ansi_term::{Colour, Style};
use chrono::{Datelike, Local, NaiveDate};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};

use lectio::calendar::DATE_FORMAT;
use lectio::errors::*;
use lectio::files::{self, Export, ExportStore};
use lectio::text::{BibleText, PassageSource};
use lectio::{Config, DatedReading, Passage, PlanType, Schedule};

/// Describes all the styles that can be used in printing text.
/// Mostly just good for disabling custom formatting.
#[derive(Debug, Clone)]
struct StyleSet {
    /// Normal text
    normal: Style,
    /// Title text (dates, plan names)
    title: Style,
    /// Passage references
    passage: Style,
    /// Description (or theme) text
    description: Style,
    /// Error text
    error: Style,
}

impl StyleSet {
    /// Preset for the --no-ansi option (no style)
    fn no_ansi() -> StyleSet {
        StyleSet {
            normal: Style::new(),
            title: Style::new(),
            passage: Style::new(),
            description: Style::new(),
            error: Style::new(),
        }
    }

    /// Preset for the normal "fancy" style
    fn fancy() -> StyleSet {
        StyleSet {
            normal: Style::new(),
            title: Colour::White.bold(),
            passage: Colour::Cyan.normal(),
            description: Style::new().italic(),
            error: Colour::Red.normal(),
        }
    }
}

/// Returns styled text (using a format string syntax)
macro_rules! style {
    ($style:expr, $($arg:tt)*) => {
        {{
            $style.paint(format!( $($arg)*) )
        }}
    }
}

/// Prints a line of text in the given style
macro_rules! styleln {
    ($style:expr, $($arg:tt)*) => {
        println!("{}", style!($style, $($arg)*))
    }
}

/// The most days `upcoming` will show at once (ten years).
const MAX_UPCOMING_DAYS: u32 = 3650;

/// The `--plan` argument shared by several subcommands.
fn plan_arg<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name("plan")
        .short("p")
        .long("plan")
        .value_name("PLAN")
        .help("The reading plan to use (see `lectio plans`)")
        .takes_value(true)
}

/// The `--start` argument shared by several subcommands.
fn start_arg<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name("start")
        .short("s")
        .long("start")
        .value_name("DATE")
        .help("The date the plan was started (YYYY-MM-DD)")
        .takes_value(true)
}

fn text_arg<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name("text")
        .short("t")
        .long("text")
        .help("Also print the text of each passage (requires `bible_text` in the config file)")
}

pub fn main() {
    let matches = App::new("lectio")
        .version("0.1.0")
        .author("Ian Johnson <ianprime0509@gmail.com>")
        .about("Daily Bible readings from several classic reading plans")
        .setting(AppSettings::ColoredHelp)
        .arg(Arg::with_name("no-ansi")
            .help("Disables fancy text output")
            .short("n")
            .long("no-ansi")
            .global(true))
        .arg(Arg::with_name("verbose")
            .help("Increase verbosity (-v info, -vv debug, -vvv trace)")
            .short("v")
            .long("verbose")
            .multiple(true)
            .global(true))
        .subcommand(SubCommand::with_name("today")
            .about("Shows today's reading")
            .arg(plan_arg())
            .arg(start_arg())
            .arg(text_arg()))
        .subcommand(SubCommand::with_name("show")
            .about("Shows the reading for a date")
            .arg(Arg::with_name("DATE")
                .help("The date to show (YYYY-MM-DD)")
                .required(true))
            .arg(plan_arg())
            .arg(start_arg())
            .arg(text_arg()))
        .subcommand(SubCommand::with_name("upcoming")
            .about("Shows the readings for the coming days")
            .arg(Arg::with_name("from")
                .short("f")
                .long("from")
                .value_name("DATE")
                .help("The first date to show (defaults to today)")
                .takes_value(true))
            .arg(Arg::with_name("days")
                .short("d")
                .long("days")
                .value_name("DAYS")
                .default_value("7")
                .help("The number of days to show (at most 3650)")
                .takes_value(true))
            .arg(plan_arg())
            .arg(start_arg()))
        .subcommand(SubCommand::with_name("plans").about("Lists the available reading plans"))
        .subcommand(SubCommand::with_name("export")
            .about("Exports a year of readings")
            .arg(plan_arg())
            .arg(start_arg())
            .arg(Arg::with_name("year")
                .short("y")
                .long("year")
                .value_name("YEAR")
                .help("The year to export (defaults to the current year)")
                .takes_value(true))
            .arg(Arg::with_name("output")
                .short("o")
                .long("output")
                .value_name("OUTPUT")
                .help("Write plain text to this file instead of storing JSON")
                .takes_value(true))
            .arg(Arg::with_name("force")
                .long("force")
                .help("Replace an existing export"))
            .after_help("Without --output, the export is stored as JSON in the data directory \
                         under the name '(plan)-(year)'; see `lectio exports`."))
        .subcommand(SubCommand::with_name("exports").about("Lists stored exports"))
        .subcommand(SubCommand::with_name("remove")
            .about("Removes a stored export")
            .arg(Arg::with_name("NAME")
                .help("The name of the export to remove, e.g. mcheyne-2026")
                .required(true)))
        .after_help("lectio schedules daily Bible readings. Settings are read from config.toml \
                     in the user configuration directory; flags override them.")
        .get_matches();

    logging::init(matches.occurrences_of("verbose"));

    // The style is settled before anything else can fail, so that errors
    // in the config file are reported in the requested style too
    let no_ansi = matches.is_present("no-ansi");
    let config = load_config();
    let style_set = match config {
        Ok(ref c) if c.ansi && !no_ansi => StyleSet::fancy(),
        Err(_) if !no_ansi => StyleSet::fancy(),
        _ => StyleSet::no_ansi(),
    };

    // Handle errors nicely
    if let Err(ref e) = config.and_then(|c| run(&matches, &c, &style_set)) {
        styleln!(style_set.error, "Error: {}", e);

        for e in e.iter().skip(1) {
            styleln!(style_set.error, "Caused by: {}", e);
        }

        if let Some(backtrace) = e.backtrace() {
            styleln!(style_set.error, "Backtrace: {:?}", backtrace);
        }

        std::process::exit(1);
    }
}

/// Reads the config file if one exists.
fn load_config() -> Result<Config> {
    match files::config_path() {
        Ok(path) => Config::load(path).chain_err(|| "could not load configuration"),
        // Without a config directory there can be no config file
        Err(Error(ErrorKind::CannotLocateConfig, _)) => Ok(Config::default()),
        Err(e) => Err(e),
    }
}

/// The main program logic.
/// Each subcommand should do its own printing, except for errors, which are returned.
fn run(m: &ArgMatches, config: &Config, style_set: &StyleSet) -> Result<()> {
    // Run the appropriate subcommand
    match m.subcommand() {
        ("today", Some(sub_m)) => show(sub_m, config, style_set, today()),
        ("show", Some(sub_m)) => {
            let date = parse_date(sub_m.value_of("DATE").unwrap())?;
            show(sub_m, config, style_set, date)
        }
        ("upcoming", Some(sub_m)) => upcoming(sub_m, config, style_set),
        ("plans", Some(_)) => plans(config, style_set),
        ("export", Some(sub_m)) => export(sub_m, config, style_set),
        ("exports", Some(_)) => exports(style_set),
        ("remove", Some(sub_m)) => remove(sub_m, style_set),
        _ => show(&ArgMatches::default(), config, style_set, today()),
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).chain_err(|| ErrorKind::InvalidDate(format!("'{}' is not a YYYY-MM-DD date", s)))
}

/// Builds the schedule from the config file, with `--plan` and `--start`
/// taking precedence. Unlike the config file, flags must be valid.
fn schedule(m: &ArgMatches, config: &Config) -> Result<Schedule> {
    let base = config.schedule();
    let plan = match m.value_of("plan") {
        Some(p) => p.parse().chain_err(|| "invalid argument to `--plan`")?,
        None => base.plan(),
    };
    let start = match m.value_of("start") {
        Some(s) => parse_date(s).chain_err(|| "invalid argument to `--start`")?,
        None => base.start_date(),
    };
    Ok(Schedule::new(plan, start))
}

/// Prints one day's reading.
fn print_reading(r: &DatedReading, style_set: &StyleSet) {
    println!("{} {}",
             style!(style_set.title, "{}", r.date.format("%a %b %e, %Y")),
             style!(style_set.normal, "(day {})", r.day));
    println!("{:4}{}",
             "",
             style!(style_set.passage, "{}", r.reading.passages.join("; ")));
    if !r.reading.theme.is_empty() {
        styleln!(style_set.description, "{:4}{}", "", r.reading.theme);
    }
}

/// The `today` and `show` subcommand logic.
fn show(m: &ArgMatches, config: &Config, style_set: &StyleSet, date: NaiveDate) -> Result<()> {
    let schedule = schedule(m, config)?;
    let reading = schedule.dated_reading(date);

    styleln!(style_set.normal, "{}", schedule.plan().info().name);
    print_reading(&reading, style_set);

    if m.is_present("text") {
        let path = match config.bible_text {
            Some(ref p) => p,
            None => bail!("no `bible_text` file is set in the config file"),
        };
        let bible = BibleText::open(path).chain_err(|| "could not load bible text")?;
        for reference in &reading.reading.passages {
            let passage: Passage = reference.parse()?;
            println!();
            match bible.passage_text(&passage) {
                Some(text) => {
                    styleln!(style_set.title, "{}", text.citation);
                    for v in text.verses {
                        println!("{} {}", style!(style_set.description, "{}:{}", v.chapter, v.verse), v.text);
                    }
                }
                None => styleln!(style_set.description, "{} is not in {}", reference, path.display()),
            }
        }
    }
    Ok(())
}

/// The `upcoming` subcommand logic.
fn upcoming(m: &ArgMatches, config: &Config, style_set: &StyleSet) -> Result<()> {
    let schedule = schedule(m, config)?;
    let from = match m.value_of("from") {
        Some(s) => parse_date(s)?,
        None => today(),
    };
    // We can unwrap this because we set a default value
    let days: u32 = m.value_of("days").unwrap().parse().chain_err(|| "invalid numeric argument to `--days`")?;
    if days > MAX_UPCOMING_DAYS {
        bail!("`--days` may be at most {}", MAX_UPCOMING_DAYS);
    }

    styleln!(style_set.normal, "{}", schedule.plan().info().name);
    for reading in schedule.upcoming(from, days) {
        print_reading(&reading, style_set);
    }
    Ok(())
}

/// The `plans` subcommand logic.
fn plans(config: &Config, style_set: &StyleSet) -> Result<()> {
    let current = config.schedule().plan();
    for plan in PlanType::ALL.iter() {
        let info = plan.info();
        let marker = if *plan == current { "*" } else { " " };
        println!("{} {} {}",
                 marker,
                 style!(style_set.title, "{:24}", info.key),
                 style!(style_set.normal, "{}", info.name));
        styleln!(style_set.description, "{:27}{}", "", info.description);
    }
    Ok(())
}

/// The `export` subcommand logic.
fn export(m: &ArgMatches, config: &Config, style_set: &StyleSet) -> Result<()> {
    let schedule = schedule(m, config)?;
    let year = match m.value_of("year") {
        Some(y) => y.parse().chain_err(|| "invalid numeric argument to `--year`")?,
        None => today().year(),
    };
    let export = Export::build(&schedule, year)?;

    if let Some(output) = m.value_of("output") {
        // Open the output file for writing, with an error if it already exists
        let path = Path::new(output);
        if path.exists() && !m.is_present("force") {
            bail!("output file '{}' already exists; will not overwrite", output);
        }
        let file = File::create(path).chain_err(|| ErrorKind::Io("could not open output file".into()))?;
        export.to_text(file).chain_err(|| "could not write to output file")?;
        styleln!(style_set.normal, "Wrote '{}' to '{}'", export.key(), output);
        return Ok(());
    }

    let store = ExportStore::open()?;
    let path = if m.is_present("force") {
        store.overwrite(&export)
    } else {
        store.add(&export)
    };
    let path = path.chain_err(|| "could not store export")?;
    styleln!(style_set.normal, "Stored '{}' at '{}'", export.key(), path.display());
    Ok(())
}

/// The `exports` subcommand logic.
fn exports(style_set: &StyleSet) -> Result<()> {
    let store = ExportStore::open()?;
    let exports = match store.exports() {
        Ok(e) => e,
        Err(Error(ErrorKind::NoDataDirectory, _)) => {
            styleln!(style_set.normal,
                     "Nothing has been exported yet; use `lectio export` to store a year of \
                      readings.");
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    // Keeps track of how many read failures we've had
    let mut failures = 0;
    let mut count = 0;

    for export in exports {
        match export {
            Ok(e) => {
                count += 1;
                println!("{} {}",
                         style!(style_set.title, "{}", e.key()),
                         style!(style_set.normal, "({}, {} days from {})", e.name, e.total_days, e.start_date));
            }
            Err(_) => failures += 1,
        }
    }

    if count == 0 && failures == 0 {
        styleln!(style_set.normal, "No exports are stored");
    }

    // Output any failures
    match failures {
        0 => {}
        1 => styleln!(style_set.error, "{}", "1 export could not be read"),
        n => styleln!(style_set.error, "{} exports could not be read", n),
    }

    Ok(())
}

/// The `remove` subcommand logic
fn remove(m: &ArgMatches, style_set: &StyleSet) -> Result<()> {
    let name = m.value_of("NAME").unwrap();

    ExportStore::open()?.remove(name).chain_err(|| "could not remove export")?;

    styleln!(style_set.normal, "Removed export {}", name);
    Ok(())
}
