//! Data series types

use autochart_core::CellAddress;
use lazy_regex::regex_is_match;

/// Data series for a chart
#[derive(Debug, Clone, PartialEq)]
pub struct DataSeries {
    /// Header cell naming the series
    pub name: Option<DataReference>,
    /// Values (Y data)
    pub values: DataReference,
    /// Categories (X data)
    pub categories: Option<DataReference>,
}

impl DataSeries {
    /// Create a new data series
    pub fn new(values: DataReference) -> Self {
        Self {
            name: None,
            values,
            categories: None,
        }
    }

    /// Set the series name reference
    pub fn with_name(mut self, name: DataReference) -> Self {
        self.name = Some(name);
        self
    }

    /// Set categories
    pub fn with_categories(mut self, categories: DataReference) -> Self {
        self.categories = Some(categories);
        self
    }
}

/// Reference to chart data: a sheet-qualified formula plus optional cached values
#[derive(Debug, Clone, PartialEq)]
pub struct DataReference {
    /// Formula reference (e.g., "Sheet1!$A$1:$A$10")
    pub formula: String,
    /// Values last read from the referenced cells
    pub cache: DataCache,
}

impl DataReference {
    /// Create a formula reference
    pub fn formula<S: Into<String>>(formula: S) -> Self {
        Self {
            formula: formula.into(),
            cache: DataCache::None,
        }
    }

    /// Reference a single column span on a sheet
    ///
    /// Rows are given in either order; the formula always lists the upper
    /// cell first.
    pub fn column_span(sheet: &str, col: u16, first_row: u32, last_row: u32) -> Self {
        let (top, bottom) = if first_row <= last_row {
            (first_row, last_row)
        } else {
            (last_row, first_row)
        };
        let letters = CellAddress::column_to_letters(col);
        let formula = if top == bottom {
            format!("{}!${}${}", quote_sheet_name(sheet), letters, top)
        } else {
            format!(
                "{}!${}${}:${}${}",
                quote_sheet_name(sheet),
                letters,
                top,
                letters,
                bottom
            )
        };
        Self::formula(formula)
    }

    /// Attach cached values
    pub fn with_cache(mut self, cache: DataCache) -> Self {
        self.cache = cache;
        self
    }
}

/// Cached values carried alongside a reference
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DataCache {
    #[default]
    None,
    /// Text points; `None` marks an empty cell
    Strings(Vec<Option<String>>),
    /// Numeric points; `None` marks an empty or non-numeric cell
    Numbers(Vec<Option<f64>>),
}

/// Quote a sheet name for use in a formula when it is not a plain identifier
///
/// ```
/// use autochart_chart::quote_sheet_name;
///
/// assert_eq!(quote_sheet_name("Data"), "Data");
/// assert_eq!(quote_sheet_name("Q1 Sales"), "'Q1 Sales'");
/// assert_eq!(quote_sheet_name("Bob's"), "'Bob''s'");
/// ```
pub fn quote_sheet_name(name: &str) -> String {
    let plain = !name.is_empty()
        && name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '.')
        && !name.starts_with(|c: char| c.is_ascii_digit() || c == '.')
        && CellAddress::parse(name).is_err()
        && !regex_is_match!(r"(?i)^(R\d*C\d*|[RC]\d*)$", name);

    if plain {
        name.to_string()
    } else {
        format!("'{}'", name.replace('\'', "''"))
    }
}
