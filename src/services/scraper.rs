use thirtyfour::error::WebDriverError;
use thirtyfour::prelude::*;

use crate::configuration::WebDriverSettings;
use crate::domain::job::{
    normalize_salary, rating_from_text, split_company_rating, JobQuery, JobRecord, JobTable,
};

const JOB_SEARCH_URL: &str = "https://www.glassdoor.com/Job/index.htm";

// Search form controls
const KEYWORD_FIELD: &str = "KeywordSearch";
const LOCATION_FIELD: &str = "LocationSearch";
const SEARCH_BUTTON: &str = "HeroSearchButton";

// Results page controls
const SORT_DROPDOWN: &str = r#"[class="css-150lexj e1gtdke60"]"#;
const SORT_MOST_RECENT: &str = r#"[data-test="date_desc"]"#;
const SIGN_UP_CLOSE: &str = r#"[alt="Close"]"#;
const LISTING_CLASS: &str = "jl";
const NEXT_PAGE_LINK: &str = r#".//a[@data-test="pagination-next"]"#;

// Listing detail panel
const RATING_INDICATOR: &str = r#".//span[@class="rating"]"#;
const OVERVIEW_TAB: &str = r#".//div[@data-tab-type="overview"]"#;
const OVERVIEW_LABELS: &str = ".//label";

/// Runs the whole search-and-collect flow against an open session and
/// returns the assembled table.
///
/// Collection stops as soon as `query.amount` records are gathered, even
/// mid-page. When the site runs out of listings first, the partial table is
/// returned and a warning logged.
pub async fn scrape_jobs(
    driver: &WebDriver,
    query: &JobQuery,
    settings: &WebDriverSettings,
) -> WebDriverResult<JobTable> {
    let mut table = JobTable::new();
    if query.amount == 0 {
        return Ok(table);
    }

    submit_search(driver, query, settings).await?;
    if query.recent {
        sort_by_most_recent(driver, settings).await?;
    }

    while table.len() < query.amount {
        // Listings render after the search round-trip settles; poll for the
        // first one before counting the page.
        driver
            .query(By::ClassName(LISTING_CLASS))
            .wait(settings.element_timeout(), settings.poll_interval())
            .first()
            .await?;
        let page_length = driver.find_all(By::ClassName(LISTING_CLASS)).await?.len();

        for index in 1..=page_length {
            if table.len() == query.amount {
                break;
            }

            select_listing(driver, index, settings).await?;
            dismiss_sign_up_popup(driver).await?;

            let record = extract_record(driver, settings).await?;
            table.push(record);
            log::info!("Collected {} out of {} jobs", table.len(), query.amount);
        }

        if table.len() < query.amount {
            match next_page_link(driver).await? {
                Some(link) => link.click().await?,
                None => {
                    log::warn!(
                        "No further result pages; stopping at {} of {} requested jobs",
                        table.len(),
                        query.amount
                    );
                    break;
                }
            }
        }
    }

    Ok(table)
}

/// Fills in the keyword and location fields and submits the search. A
/// control that never becomes clickable fails the run.
async fn submit_search(
    driver: &WebDriver,
    query: &JobQuery,
    settings: &WebDriverSettings,
) -> WebDriverResult<()> {
    driver.goto(JOB_SEARCH_URL).await?;

    let keyword = wait_clickable(driver, By::Id(KEYWORD_FIELD), settings).await?;
    keyword.send_keys(query.position.clone()).await?;

    let location = wait_clickable(driver, By::Id(LOCATION_FIELD), settings).await?;
    location.clear().await?;
    location.send_keys(query.location.clone()).await?;

    wait_clickable(driver, By::Id(SEARCH_BUTTON), settings)
        .await?
        .click()
        .await?;

    Ok(())
}

async fn sort_by_most_recent(
    driver: &WebDriver,
    settings: &WebDriverSettings,
) -> WebDriverResult<()> {
    wait_clickable(driver, By::Css(SORT_DROPDOWN), settings)
        .await?
        .click()
        .await?;
    wait_clickable(driver, By::Css(SORT_MOST_RECENT), settings)
        .await?
        .click()
        .await?;

    Ok(())
}

/// Clicks the nth listing on the page. The sign-up interstitial sometimes
/// swallows the click; that is handled by the dismissal that follows.
async fn select_listing(
    driver: &WebDriver,
    index: usize,
    settings: &WebDriverSettings,
) -> WebDriverResult<()> {
    let xpath = listing_xpath(index);
    let listing = driver
        .query(By::XPath(&xpath))
        .wait(settings.element_timeout(), settings.poll_interval())
        .first()
        .await?;

    match listing.click().await {
        Err(WebDriverError::ElementClickIntercepted(_)) => Ok(()),
        result => result,
    }
}

async fn dismiss_sign_up_popup(driver: &WebDriver) -> WebDriverResult<()> {
    match driver.find(By::Css(SIGN_UP_CLOSE)).await {
        Ok(close) => close.click().await,
        Err(WebDriverError::NoSuchElement(_)) => Ok(()),
        Err(e) => Err(e),
    }
}

/// Scrapes every field of the currently selected listing. No single
/// field's absence aborts the others.
async fn extract_record(
    driver: &WebDriver,
    settings: &WebDriverSettings,
) -> WebDriverResult<JobRecord> {
    let (company_raw, position, location) = read_details_header(driver, settings).await?;
    let (company, rating_suffix) = split_company_rating(&company_raw);

    // The indicator element marks that a rating exists; the value itself
    // sits in the indicator text or at the end of the company header.
    let rating = match lookup_text(driver, By::XPath(RATING_INDICATOR)).await? {
        Some(indicator) => rating_from_text(&indicator).or(rating_suffix),
        None => None,
    };

    let salary_xpath = details_field_xpath(4);
    let salary_estimate = lookup_text(driver, By::XPath(&salary_xpath))
        .await?
        .map(|raw| normalize_salary(&raw));

    let overview = read_company_overview(driver, settings).await?;

    Ok(JobRecord {
        company,
        position,
        location,
        rating,
        salary_estimate,
        size: overview.size,
        founded: overview.founded,
        company_type: overview.company_type,
        industry: overview.industry,
        sector: overview.sector,
        revenue: overview.revenue,
    })
}

/// Reads company, position and location off the details panel. The panel
/// re-renders shortly after a listing click, invalidating element
/// references; stale reads are retried up to the configured cap.
async fn read_details_header(
    driver: &WebDriver,
    settings: &WebDriverSettings,
) -> WebDriverResult<(String, String, String)> {
    let mut stale_reads = 0;
    loop {
        match try_read_details_header(driver, settings).await {
            Err(WebDriverError::StaleElementReference(_))
                if stale_reads < settings.stale_retry_limit =>
            {
                stale_reads += 1;
                tokio::time::sleep(settings.poll_interval()).await;
            }
            Err(WebDriverError::StaleElementReference(_)) => {
                return Err(WebDriverError::Timeout(
                    "details panel kept re-rendering while reading company, position and location"
                        .to_string(),
                ));
            }
            result => return result,
        }
    }
}

async fn try_read_details_header(
    driver: &WebDriver,
    settings: &WebDriverSettings,
) -> WebDriverResult<(String, String, String)> {
    let company_xpath = details_field_xpath(1);
    let company = driver
        .query(By::XPath(&company_xpath))
        .wait(settings.element_timeout(), settings.poll_interval())
        .first()
        .await?
        .text()
        .await?;
    let position_xpath = details_field_xpath(2);
    let position = driver
        .find(By::XPath(&position_xpath))
        .await?
        .text()
        .await?;
    let location_xpath = details_field_xpath(3);
    let location = driver
        .find(By::XPath(&location_xpath))
        .await?
        .text()
        .await?;

    Ok((company, position, location))
}

#[derive(Debug, Default)]
struct CompanyOverview {
    size: Option<String>,
    founded: Option<String>,
    company_type: Option<String>,
    industry: Option<String>,
    sector: Option<String>,
    revenue: Option<String>,
}

/// Opens the company overview tab and reads its label/value pairs. A
/// missing tab, or a tab that never renders its labels, yields an entirely
/// empty overview; a missing individual label only blanks that field.
async fn read_company_overview(
    driver: &WebDriver,
    settings: &WebDriverSettings,
) -> WebDriverResult<CompanyOverview> {
    let tab = match driver.find(By::XPath(OVERVIEW_TAB)).await {
        Ok(tab) => tab,
        Err(WebDriverError::NoSuchElement(_)) => return Ok(CompanyOverview::default()),
        Err(e) => return Err(e),
    };
    tab.click().await?;

    let labels_rendered = driver
        .query(By::XPath(OVERVIEW_LABELS))
        .wait(settings.element_timeout(), settings.poll_interval())
        .first()
        .await;
    match labels_rendered {
        Ok(_) => {}
        Err(WebDriverError::NoSuchElement(_)) | Err(WebDriverError::Timeout(_)) => {
            return Ok(CompanyOverview::default());
        }
        Err(e) => return Err(e),
    }

    Ok(CompanyOverview {
        size: overview_value(driver, "Size").await?,
        founded: overview_value(driver, "Founded").await?,
        company_type: overview_value(driver, "Type").await?,
        industry: overview_value(driver, "Industry").await?,
        sector: overview_value(driver, "Sector").await?,
        revenue: overview_value(driver, "Revenue").await?,
    })
}

async fn overview_value(driver: &WebDriver, field: &str) -> WebDriverResult<Option<String>> {
    let xpath = overview_field_xpath(field);
    lookup_text(driver, By::XPath(&xpath)).await
}

async fn next_page_link(driver: &WebDriver) -> WebDriverResult<Option<WebElement>> {
    match driver.find(By::XPath(NEXT_PAGE_LINK)).await {
        Ok(link) => Ok(Some(link)),
        Err(WebDriverError::NoSuchElement(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Looks an element's text up without waiting: a missing element is data
/// ("no value"), any other driver failure is an error.
async fn lookup_text(driver: &WebDriver, by: By) -> WebDriverResult<Option<String>> {
    match driver.find(by).await {
        Ok(element) => Ok(Some(element.text().await?)),
        Err(WebDriverError::NoSuchElement(_)) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Polls until the element is present and clickable, within the configured
/// timeout.
async fn wait_clickable(
    driver: &WebDriver,
    by: By,
    settings: &WebDriverSettings,
) -> WebDriverResult<WebElement> {
    let element = driver
        .query(by)
        .wait(settings.element_timeout(), settings.poll_interval())
        .first()
        .await?;
    element
        .wait_until()
        .wait(settings.element_timeout(), settings.poll_interval())
        .clickable()
        .await?;

    Ok(element)
}

fn listing_xpath(index: usize) -> String {
    format!(r#".//ul[@class ="jlGrid hover "]/li[{}]"#, index)
}

fn details_field_xpath(index: usize) -> String {
    format!(r#".//div[@class ="empInfo newDetails"]/div[{}]"#, index)
}

fn overview_field_xpath(field: &str) -> String {
    format!(r#".//label[text()="{}"]/following-sibling::span"#, field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_xpath_addresses_the_nth_item() {
        assert_eq!(listing_xpath(1), r#".//ul[@class ="jlGrid hover "]/li[1]"#);
        assert_eq!(listing_xpath(30), r#".//ul[@class ="jlGrid hover "]/li[30]"#);
    }

    #[test]
    fn details_field_xpath_addresses_panel_children() {
        assert_eq!(
            details_field_xpath(4),
            r#".//div[@class ="empInfo newDetails"]/div[4]"#
        );
    }

    #[test]
    fn overview_field_xpath_pairs_label_with_value() {
        assert_eq!(
            overview_field_xpath("Founded"),
            r#".//label[text()="Founded"]/following-sibling::span"#
        );
    }
}
