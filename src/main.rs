use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use jobscout::configuration::get_configuration;
use jobscout::domain::job::{JobQuery, JobTable, COLUMNS};
use jobscout::services::{scrape_jobs, spreadsheet, Droid};

#[derive(Debug, Parser)]
#[command(
    name = "jobscout",
    version,
    about = "Scrapes Glassdoor job listings into a table"
)]
struct Cli {
    /// Job position to search for
    position: String,

    /// Geographical area to search within
    location: String,

    /// Number of jobs to collect
    #[arg(short, long, value_name = "N")]
    amount: usize,

    /// Keep the site's relevance ordering instead of sorting by most recent
    #[arg(long, default_value_t = false)]
    relevance: bool,

    /// Save the table as "Glassdoor Jobs.xlsx" in the working directory
    #[arg(long, default_value_t = false)]
    save: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let configuration = get_configuration().context("Failed to read configuration")?;

    let query = JobQuery {
        position: cli.position,
        location: cli.location,
        amount: cli.amount,
        recent: !cli.relevance,
    };

    let droid = Droid::new(&configuration.webdriver)
        .await
        .context("Failed to open the browser session")?;
    let scraped = scrape_jobs(&droid.driver, &query, &configuration.webdriver).await;
    droid.quit().await?;
    let table = scraped?;

    print_table(&table);

    if cli.save {
        spreadsheet::save_table(&table, spreadsheet::EXPORT_FILE)
            .context("Failed to save the spreadsheet")?;
        log::info!("Saved {} jobs to {}", table.len(), spreadsheet::EXPORT_FILE);
    }

    Ok(())
}

fn print_table(table: &JobTable) {
    let rows = table.rows();

    let mut widths: Vec<usize> = COLUMNS.iter().map(|name| name.len()).collect();
    for row in &rows {
        for (index, value) in row.iter().enumerate() {
            widths[index] = widths[index].max(value.len());
        }
    }

    for (index, name) in COLUMNS.iter().enumerate() {
        print!("{:<1$}  ", name, widths[index]);
    }
    println!();
    for row in &rows {
        for (index, value) in row.iter().enumerate() {
            print!("{:<1$}  ", value, widths[index]);
        }
        println!();
    }
}
