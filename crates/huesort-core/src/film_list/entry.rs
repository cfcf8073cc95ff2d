use super::FilmRow;

/// The columns the poster pipeline reads from a film row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilmEntry {
    /// Film title, as written in the `Name` column.
    pub name: String,
    /// Film page link from the `URL` column (usually a `boxd.it` short link).
    pub url: String,
    /// Release year, when the export has a `Year` column.
    pub year: Option<String>,
}

impl FilmEntry {
    /// Returns `None` when the row has no usable name or URL.
    pub fn from_row(row: &FilmRow) -> Option<Self> {
        let name = row.get("Name").map(str::trim).filter(|s| !s.is_empty())?;
        let url = row.get("URL").map(str::trim).filter(|s| !s.is_empty())?;
        let year = row
            .get("Year")
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        Some(Self {
            name: name.to_string(),
            url: url.to_string(),
            year,
        })
    }

    /// `Name (Year)` for messages.
    pub fn label(&self) -> String {
        match &self.year {
            Some(y) => format!("{} ({})", self.name, y),
            None => self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::film_list::{parse_reader, HeaderPattern};

    fn rows(csv: &str) -> Vec<FilmRow> {
        let pattern = HeaderPattern::new(&["Name", "URL"]).unwrap();
        parse_reader(csv.as_bytes(), &pattern, 6).unwrap().films
    }

    #[test]
    fn reads_name_url_and_year() {
        let rows = rows("Name,Year,URL,Tags\n Amélie ,2001,https://boxd.it/2aUc,paris\n");
        let entry = FilmEntry::from_row(&rows[0]).unwrap();
        assert_eq!(entry.name, "Amélie");
        assert_eq!(entry.url, "https://boxd.it/2aUc");
        assert_eq!(entry.year.as_deref(), Some("2001"));
        assert_eq!(entry.label(), "Amélie (2001)");
    }

    #[test]
    fn year_is_optional() {
        let rows = rows("Name,URL\nRRR,https://boxd.it/ljDs\n");
        let entry = FilmEntry::from_row(&rows[0]).unwrap();
        assert!(entry.year.is_none());
        assert_eq!(entry.label(), "RRR");
    }

    #[test]
    fn blank_name_or_url_rejected() {
        let rows = rows("Name,URL\n,https://boxd.it/ljDs\nRRR,  \nOldboy\n");
        assert!(rows.iter().all(|r| FilmEntry::from_row(r).is_none()));
    }
}
