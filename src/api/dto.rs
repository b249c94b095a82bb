//! Wire shapes for the HTTP boundary.

use serde::{Deserialize, Serialize};

use crate::domain::Entry;
use crate::service::{EntryList, Page};
use super::error::ApiError;

/// Entry as seen by clients; `index` is the sort key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryDto {
    pub id: String,
    pub content: String,
    pub done: bool,
    pub index: f64,
}

impl From<Entry> for EntryDto {
    fn from(entry: Entry) -> Self {
        Self {
            id: entry.id,
            content: entry.content,
            done: entry.done,
            index: entry.key,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EntryListDto {
    pub todolist: Vec<EntryDto>,
    pub page: PageDto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageDto {
    pub page: u32,
    pub size: u32,
}

impl From<Page> for PageDto {
    fn from(page: Page) -> Self {
        Self {
            page: page.page,
            size: page.size,
        }
    }
}

impl From<EntryList> for EntryListDto {
    fn from(list: EntryList) -> Self {
        Self {
            todolist: list.entries.into_iter().map(EntryDto::from).collect(),
            page: list.page.into(),
        }
    }
}

/// Body of create and update requests
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EntryBody {
    pub content: String,
    pub done: bool,
}

/// Raw paging parameters, parsed by hand so bad or empty numbers become 400s
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub size: Option<String>,
}

impl ListQuery {
    /// Resolve to `(page, size)` using the defaults for absent values.
    pub fn resolve(&self, default_size: u32) -> Result<(i64, i64), ApiError> {
        let page = parse_number("page", self.page.as_deref())?.unwrap_or(0);
        let size = parse_number("size", self.size.as_deref())?.unwrap_or(i64::from(default_size));
        Ok((page, size))
    }
}

fn parse_number(name: &str, raw: Option<&str>) -> Result<Option<i64>, ApiError> {
    match raw.map(str::trim) {
        None => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ApiError::bad_request(format!("{} must be an integer, got {:?}", name, value))),
    }
}

/// `PUT /sort` parameters; empty neighbor ids count as absent
#[derive(Debug, Default, Deserialize)]
pub struct SortQuery {
    pub currentid: Option<String>,
    pub backid: Option<String>,
    pub frontid: Option<String>,
}

impl SortQuery {
    pub fn target(&self) -> Result<&str, ApiError> {
        non_empty(&self.currentid).ok_or_else(|| ApiError::bad_request("currentid is required"))
    }

    pub fn back(&self) -> Option<&str> {
        non_empty(&self.backid)
    }

    pub fn front(&self) -> Option<&str> {
        non_empty(&self.frontid)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RenormalizedDto {
    pub renormalized: usize,
}
