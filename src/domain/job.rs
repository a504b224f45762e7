use regex::Regex;

/// Column order of the assembled table, also the spreadsheet header row.
pub const COLUMNS: [&str; 11] = [
    "Company",
    "Position",
    "Location",
    "Rating",
    "Salary Estimate",
    "Size",
    "Founded",
    "Type",
    "Industry",
    "Sector",
    "Revenue",
];

/// Stand-in written out for a field the page did not provide.
pub const MISSING: &str = "nan";

#[derive(Debug, Clone)]
pub struct JobQuery {
    pub position: String,
    pub location: String,
    pub amount: usize,
    pub recent: bool,
}

/// One scraped listing. Company, position and location always come off the
/// details panel; every other field is absent whenever the page omits it.
#[derive(Debug, Clone, PartialEq)]
pub struct JobRecord {
    pub company: String,
    pub position: String,
    pub location: String,
    pub rating: Option<String>,
    pub salary_estimate: Option<String>,
    pub size: Option<String>,
    pub founded: Option<String>,
    pub company_type: Option<String>,
    pub industry: Option<String>,
    pub sector: Option<String>,
    pub revenue: Option<String>,
}

impl JobRecord {
    /// Renders the record in [`COLUMNS`] order, substituting [`MISSING`]
    /// for absent fields.
    pub fn to_row(&self) -> [String; 11] {
        [
            self.company.clone(),
            self.position.clone(),
            self.location.clone(),
            cell(&self.rating),
            cell(&self.salary_estimate),
            cell(&self.size),
            cell(&self.founded),
            cell(&self.company_type),
            cell(&self.industry),
            cell(&self.sector),
            cell(&self.revenue),
        ]
    }
}

fn cell(field: &Option<String>) -> String {
    field.clone().unwrap_or_else(|| MISSING.to_string())
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobTable {
    records: Vec<JobRecord>,
}

impl JobTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<JobRecord>) -> Self {
        Self { records }
    }

    pub fn push(&mut self, record: JobRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[JobRecord] {
        &self.records
    }

    pub fn rows(&self) -> Vec<[String; 11]> {
        self.records.iter().map(JobRecord::to_row).collect()
    }
}

/// Drops the trailing parenthesized qualifier from a salary line, so
/// "$80K - $120K (Glassdoor est.)" becomes "$80K - $120K".
pub fn normalize_salary(raw: &str) -> String {
    let qualifier = Regex::new(r"\s\(.*\)").unwrap();
    match qualifier.find(raw) {
        Some(found) => raw[..found.start()].to_string(),
        None => raw.to_string(),
    }
}

/// The company header embeds the rating after a newline ("Acme Corp\n3.5").
/// Returns the company name and whatever rating the trailing text carries.
pub fn split_company_rating(raw: &str) -> (String, Option<String>) {
    match raw.split_once('\n') {
        Some((company, tail)) => (company.trim().to_string(), rating_from_text(tail)),
        None => (raw.trim().to_string(), None),
    }
}

/// Pulls a "d.d" rating value out of scraped text; the last occurrence wins.
pub fn rating_from_text(text: &str) -> Option<String> {
    let rating = Regex::new(r"[0-9]\.[0-9]").unwrap();
    rating
        .find_iter(text)
        .last()
        .map(|found| found.as_str().to_string())
}
