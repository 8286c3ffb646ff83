use thiserror::Error;
use url::Url;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QueryError {
    #[error("Enter a poem title or paste a URL")]
    Missing,

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// What to look up when acquiring a poem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoemQuery {
    title: Option<String>,
    author: Option<String>,
    url: Option<Url>,
}

/// The lookup strategy a query resolves to. A URL wins over a title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoemLookup<'a> {
    Url(&'a Url),
    Title {
        title: &'a str,
        author: Option<&'a str>,
    },
}

fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl PoemQuery {
    /// Build a query from raw form input. Blank fields count as absent.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::Missing` when neither title nor URL is given, and
    /// `QueryError::InvalidUrl` for a URL that is not absolute http(s).
    pub fn new(title: &str, author: &str, url: &str) -> Result<Self, QueryError> {
        let title = non_blank(title);
        let author = non_blank(author);
        let url = non_blank(url)
            .map(|raw| {
                let parsed = Url::parse(&raw).map_err(|_| QueryError::InvalidUrl(raw.clone()))?;
                match parsed.scheme() {
                    "http" | "https" => Ok(parsed),
                    _ => Err(QueryError::InvalidUrl(raw)),
                }
            })
            .transpose()?;

        if title.is_none() && url.is_none() {
            return Err(QueryError::Missing);
        }

        Ok(Self { title, author, url })
    }

    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    #[must_use]
    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    #[must_use]
    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    #[must_use]
    pub fn lookup(&self) -> PoemLookup<'_> {
        match &self.url {
            Some(url) => PoemLookup::Url(url),
            // `new` guarantees a title whenever the url is absent.
            None => PoemLookup::Title {
                title: self.title.as_deref().unwrap_or_default(),
                author: self.author.as_deref(),
            },
        }
    }
}
