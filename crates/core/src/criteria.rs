//! Query options for listing Movies: filter criteria, paging and sorting.
//!
//! The wire encoding is a flat list of query-string pairs:
//!
//! ```text
//! id.greaterThan=5&name.contains=heat&rating.specified=true&page=0&size=20&sort=rating,desc
//! ```
//!
//! The client builds these pairs with [`QueryOptions::to_pairs`]; the backend
//! parses them back with [`QueryOptions::from_pairs`] and evaluates
//! [`MovieCriteria::matches`] / [`Pageable::sort`] against its records.

use core::cmp::Ordering;
use core::fmt::Display;
use core::str::FromStr;

use crate::error::{DomainError, DomainResult};
use crate::id::MovieId;
use crate::movie::Movie;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 2000;

/// Sortable/filterable attribute of a Movies record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieField {
    Id,
    Name,
    Category,
    Rating,
}

impl MovieField {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovieField::Id => "id",
            MovieField::Name => "name",
            MovieField::Category => "category",
            MovieField::Rating => "rating",
        }
    }
}

impl FromStr for MovieField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "id" => Ok(MovieField::Id),
            "name" => Ok(MovieField::Name),
            "category" => Ok(MovieField::Category),
            "rating" => Ok(MovieField::Rating),
            other => Err(DomainError::validation(format!("unknown sort field '{other}'"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

/// One `sort=<field>,<direction>` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub field: MovieField,
    pub direction: Direction,
}

impl SortOrder {
    pub fn asc(field: MovieField) -> Self {
        Self {
            field,
            direction: Direction::Asc,
        }
    }

    pub fn desc(field: MovieField) -> Self {
        Self {
            field,
            direction: Direction::Desc,
        }
    }

    /// Compare two records on this order's field.
    ///
    /// Missing values sort after present ones when ascending and before them
    /// when descending (the SQL default).
    pub fn compare(&self, a: &Movie, b: &Movie) -> Ordering {
        let ordering = match self.field {
            MovieField::Id => a.id.cmp(&b.id),
            MovieField::Name => nulls_last(a.name.as_deref(), b.name.as_deref(), |x, y| x.cmp(y)),
            MovieField::Category => nulls_last(a.category.as_deref(), b.category.as_deref(), |x, y| {
                x.cmp(y)
            }),
            MovieField::Rating => nulls_last(a.rating, b.rating, |x, y| {
                x.partial_cmp(&y).unwrap_or(Ordering::Equal)
            }),
        };
        match self.direction {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    }
}

fn nulls_last<T>(a: Option<T>, b: Option<T>, cmp: impl Fn(T, T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => cmp(x, y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl core::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{},{}", self.field.as_str(), self.direction.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, direction) = match s.split_once(',') {
            Some((field, direction)) => (field, Some(direction)),
            None => (s, None),
        };
        let field = field.parse::<MovieField>()?;
        let direction = match direction.map(|d| d.trim().to_ascii_lowercase()) {
            None => Direction::Asc,
            Some(d) if d == "asc" => Direction::Asc,
            Some(d) if d == "desc" => Direction::Desc,
            Some(d) => {
                return Err(DomainError::validation(format!("unknown sort direction '{d}'")));
            }
        };
        Ok(Self { field, direction })
    }
}

/// Filter over an ordered attribute (`id`, `rating`).
///
/// Every populated condition must hold; a record whose attribute is missing
/// only matches `specified=false`.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeFilter<T> {
    pub equals: Option<T>,
    pub not_equals: Option<T>,
    pub specified: Option<bool>,
    pub in_list: Option<Vec<T>>,
    pub not_in_list: Option<Vec<T>>,
    pub greater_than: Option<T>,
    pub less_than: Option<T>,
    pub greater_than_or_equal: Option<T>,
    pub less_than_or_equal: Option<T>,
}

impl<T> Default for RangeFilter<T> {
    fn default() -> Self {
        Self {
            equals: None,
            not_equals: None,
            specified: None,
            in_list: None,
            not_in_list: None,
            greater_than: None,
            less_than: None,
            greater_than_or_equal: None,
            less_than_or_equal: None,
        }
    }
}

impl<T: Copy> RangeFilter<T> {
    /// Convert every bound (e.g. typed id to its raw column value).
    pub fn map<U>(&self, f: impl Fn(T) -> U) -> RangeFilter<U> {
        RangeFilter {
            equals: self.equals.map(&f),
            not_equals: self.not_equals.map(&f),
            specified: self.specified,
            in_list: self.in_list.as_ref().map(|xs| xs.iter().copied().map(&f).collect()),
            not_in_list: self.not_in_list.as_ref().map(|xs| xs.iter().copied().map(&f).collect()),
            greater_than: self.greater_than.map(&f),
            less_than: self.less_than.map(&f),
            greater_than_or_equal: self.greater_than_or_equal.map(&f),
            less_than_or_equal: self.less_than_or_equal.map(&f),
        }
    }
}

impl<T> RangeFilter<T>
where
    T: Copy + PartialOrd + Display + FromStr,
{
    pub fn is_empty(&self) -> bool {
        self.equals.is_none()
            && self.not_equals.is_none()
            && self.specified.is_none()
            && self.in_list.is_none()
            && self.not_in_list.is_none()
            && self.greater_than.is_none()
            && self.less_than.is_none()
            && self.greater_than_or_equal.is_none()
            && self.less_than_or_equal.is_none()
    }

    pub fn matches(&self, value: Option<T>) -> bool {
        if let Some(specified) = self.specified {
            if specified != value.is_some() {
                return false;
            }
        }
        let has_value_conditions = self.equals.is_some()
            || self.not_equals.is_some()
            || self.in_list.is_some()
            || self.not_in_list.is_some()
            || self.greater_than.is_some()
            || self.less_than.is_some()
            || self.greater_than_or_equal.is_some()
            || self.less_than_or_equal.is_some();
        let Some(v) = value else {
            return !has_value_conditions;
        };

        self.equals.is_none_or(|x| v == x)
            && self.not_equals.is_none_or(|x| v != x)
            && self.in_list.as_ref().is_none_or(|xs| xs.iter().any(|x| *x == v))
            && self.not_in_list.as_ref().is_none_or(|xs| xs.iter().all(|x| *x != v))
            && self.greater_than.is_none_or(|x| v > x)
            && self.less_than.is_none_or(|x| v < x)
            && self.greater_than_or_equal.is_none_or(|x| v >= x)
            && self.less_than_or_equal.is_none_or(|x| v <= x)
    }

    fn push_pairs(&self, prefix: &str, out: &mut Vec<(String, String)>) {
        let mut push = |op: &str, value: String| out.push((format!("{prefix}.{op}"), value));
        if let Some(v) = self.equals {
            push("equals", v.to_string());
        }
        if let Some(v) = self.not_equals {
            push("notEquals", v.to_string());
        }
        if let Some(v) = self.specified {
            push("specified", v.to_string());
        }
        if let Some(vs) = &self.in_list {
            push("in", join(vs));
        }
        if let Some(vs) = &self.not_in_list {
            push("notIn", join(vs));
        }
        if let Some(v) = self.greater_than {
            push("greaterThan", v.to_string());
        }
        if let Some(v) = self.less_than {
            push("lessThan", v.to_string());
        }
        if let Some(v) = self.greater_than_or_equal {
            push("greaterThanOrEqual", v.to_string());
        }
        if let Some(v) = self.less_than_or_equal {
            push("lessThanOrEqual", v.to_string());
        }
    }

    /// Apply `<prefix>.<op>=<raw>`; returns `false` for an unknown operator.
    fn apply(&mut self, op: &str, raw: &str) -> DomainResult<bool> {
        match op {
            "equals" => self.equals = Some(parse_value(op, raw)?),
            "notEquals" => self.not_equals = Some(parse_value(op, raw)?),
            "specified" => self.specified = Some(parse_value(op, raw)?),
            "in" => self.in_list = Some(parse_list(op, raw)?),
            "notIn" => self.not_in_list = Some(parse_list(op, raw)?),
            "greaterThan" => self.greater_than = Some(parse_value(op, raw)?),
            "lessThan" => self.less_than = Some(parse_value(op, raw)?),
            "greaterThanOrEqual" => self.greater_than_or_equal = Some(parse_value(op, raw)?),
            "lessThanOrEqual" => self.less_than_or_equal = Some(parse_value(op, raw)?),
            _ => return Ok(false),
        }
        Ok(true)
    }
}

/// Filter over a text attribute (`name`, `category`).
///
/// `equals`/`in` compare exactly; `contains`/`doesNotContain` ignore case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringFilter {
    pub equals: Option<String>,
    pub not_equals: Option<String>,
    pub specified: Option<bool>,
    pub in_list: Option<Vec<String>>,
    pub not_in_list: Option<Vec<String>>,
    pub contains: Option<String>,
    pub does_not_contain: Option<String>,
}

impl StringFilter {
    pub fn is_empty(&self) -> bool {
        *self == StringFilter::default()
    }

    pub fn matches(&self, value: Option<&str>) -> bool {
        if let Some(specified) = self.specified {
            if specified != value.is_some() {
                return false;
            }
        }
        let has_value_conditions = self.equals.is_some()
            || self.not_equals.is_some()
            || self.in_list.is_some()
            || self.not_in_list.is_some()
            || self.contains.is_some()
            || self.does_not_contain.is_some();
        let Some(v) = value else {
            return !has_value_conditions;
        };
        let lowered = v.to_lowercase();

        self.equals.as_deref().is_none_or(|x| v == x)
            && self.not_equals.as_deref().is_none_or(|x| v != x)
            && self.in_list.as_ref().is_none_or(|xs| xs.iter().any(|x| x == v))
            && self.not_in_list.as_ref().is_none_or(|xs| xs.iter().all(|x| x != v))
            && self
                .contains
                .as_deref()
                .is_none_or(|x| lowered.contains(&x.to_lowercase()))
            && self
                .does_not_contain
                .as_deref()
                .is_none_or(|x| !lowered.contains(&x.to_lowercase()))
    }

    fn push_pairs(&self, prefix: &str, out: &mut Vec<(String, String)>) {
        let mut push = |op: &str, value: String| out.push((format!("{prefix}.{op}"), value));
        if let Some(v) = &self.equals {
            push("equals", v.clone());
        }
        if let Some(v) = &self.not_equals {
            push("notEquals", v.clone());
        }
        if let Some(v) = self.specified {
            push("specified", v.to_string());
        }
        if let Some(vs) = &self.in_list {
            push("in", vs.join(","));
        }
        if let Some(vs) = &self.not_in_list {
            push("notIn", vs.join(","));
        }
        if let Some(v) = &self.contains {
            push("contains", v.clone());
        }
        if let Some(v) = &self.does_not_contain {
            push("doesNotContain", v.clone());
        }
    }

    fn apply(&mut self, op: &str, raw: &str) -> DomainResult<bool> {
        match op {
            "equals" => self.equals = Some(raw.to_string()),
            "notEquals" => self.not_equals = Some(raw.to_string()),
            "specified" => self.specified = Some(parse_value(op, raw)?),
            "in" => self.in_list = Some(raw.split(',').map(str::to_string).collect()),
            "notIn" => self.not_in_list = Some(raw.split(',').map(str::to_string).collect()),
            "contains" => self.contains = Some(raw.to_string()),
            "doesNotContain" => self.does_not_contain = Some(raw.to_string()),
            _ => return Ok(false),
        }
        Ok(true)
    }
}

fn join<T: Display>(values: &[T]) -> String {
    values.iter().map(ToString::to_string).collect::<Vec<_>>().join(",")
}

fn parse_value<T: FromStr>(op: &str, raw: &str) -> DomainResult<T> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| DomainError::validation(format!("invalid value '{raw}' for '{op}'")))
}

fn parse_list<T: FromStr>(op: &str, raw: &str) -> DomainResult<Vec<T>> {
    raw.split(',').map(|part| parse_value(op, part)).collect()
}

/// All filters a list/count request may carry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieCriteria {
    pub id: RangeFilter<MovieId>,
    pub name: StringFilter,
    pub category: StringFilter,
    pub rating: RangeFilter<f64>,
    /// Accepted for compatibility; a single-table resource never yields duplicates.
    pub distinct: Option<bool>,
}

impl MovieCriteria {
    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
            && self.name.is_empty()
            && self.category.is_empty()
            && self.rating.is_empty()
            && self.distinct.is_none()
    }

    pub fn matches(&self, movie: &Movie) -> bool {
        self.id.matches(Some(movie.id))
            && self.name.matches(movie.name.as_deref())
            && self.category.matches(movie.category.as_deref())
            && self.rating.matches(movie.rating)
    }

    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        self.id.push_pairs("id", &mut out);
        self.name.push_pairs("name", &mut out);
        self.category.push_pairs("category", &mut out);
        self.rating.push_pairs("rating", &mut out);
        if let Some(distinct) = self.distinct {
            out.push(("distinct".to_string(), distinct.to_string()));
        }
        out
    }

    /// Apply one query pair. Returns `false` when the key is not a criteria key.
    pub fn apply_pair(&mut self, key: &str, value: &str) -> DomainResult<bool> {
        if key == "distinct" {
            self.distinct = Some(parse_value(key, value)?);
            return Ok(true);
        }
        let Some((attribute, op)) = key.split_once('.') else {
            return Ok(false);
        };
        let applied = match attribute {
            "id" => self.id.apply(op, value)?,
            "name" => self.name.apply(op, value)?,
            "category" => self.category.apply(op, value)?,
            "rating" => self.rating.apply(op, value)?,
            _ => false,
        };
        if !applied && matches!(attribute, "id" | "name" | "category" | "rating") {
            return Err(DomainError::validation(format!("unknown filter '{key}'")));
        }
        Ok(applied)
    }

    pub fn from_pairs<K, V>(pairs: &[(K, V)]) -> DomainResult<Self>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut criteria = Self::default();
        for (key, value) in pairs {
            criteria.apply_pair(key.as_ref(), value.as_ref())?;
        }
        Ok(criteria)
    }
}

/// Options a caller may pass to a list request. Everything is optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryOptions {
    pub criteria: MovieCriteria,
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort: Vec<SortOrder>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }

    pub fn sort(mut self, order: SortOrder) -> Self {
        self.sort.push(order);
        self
    }

    pub fn criteria(mut self, criteria: MovieCriteria) -> Self {
        self.criteria = criteria;
        self
    }

    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut out = self.criteria.to_pairs();
        if let Some(page) = self.page {
            out.push(("page".to_string(), page.to_string()));
        }
        if let Some(size) = self.size {
            out.push(("size".to_string(), size.to_string()));
        }
        for order in &self.sort {
            out.push(("sort".to_string(), order.to_string()));
        }
        out
    }

    /// Parse a request's query pairs. Keys that are neither criteria nor
    /// paging keys are ignored.
    pub fn from_pairs<K, V>(pairs: &[(K, V)]) -> DomainResult<Self>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut options = Self::default();
        for (key, value) in pairs {
            let (key, value) = (key.as_ref(), value.as_ref());
            match key {
                "page" => options.page = Some(parse_value(key, value)?),
                "size" => options.size = Some(parse_value(key, value)?),
                "sort" => options.sort.push(value.parse()?),
                _ => {
                    options.criteria.apply_pair(key, value)?;
                }
            }
        }
        Ok(options)
    }

    /// Resolve paging defaults and bounds.
    pub fn pageable(&self) -> DomainResult<Pageable> {
        let size = self.size.unwrap_or(DEFAULT_PAGE_SIZE);
        if size == 0 || size > MAX_PAGE_SIZE {
            return Err(DomainError::validation(format!(
                "page size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        Ok(Pageable {
            page: self.page.unwrap_or(0),
            size,
            sort: self.sort.clone(),
        })
    }
}

/// Resolved paging request (0-based page).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pageable {
    pub page: u32,
    pub size: u32,
    pub sort: Vec<SortOrder>,
}

impl Default for Pageable {
    fn default() -> Self {
        Self {
            page: 0,
            size: DEFAULT_PAGE_SIZE,
            sort: Vec::new(),
        }
    }
}

impl Pageable {
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }

    /// Order records by the requested sort orders, then by id for stability.
    pub fn sort(&self, movies: &mut [Movie]) {
        movies.sort_by(|a, b| {
            self.sort
                .iter()
                .map(|order| order.compare(a, b))
                .find(|o| *o != Ordering::Equal)
                .unwrap_or_else(|| a.id.cmp(&b.id))
        });
    }

    /// Number of pages needed for `total` records (at least one).
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.size)).max(1)
    }
}
