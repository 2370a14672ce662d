use std::ops::Index;
use std::slice;

/// A single URL parameter, consisting of a key and a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub key: String,
    pub value: String,
}

impl Param {
    pub fn new(key: &str, value: &str) -> Param {
        Param {
            key: key.to_owned(),
            value: value.to_owned(),
        }
    }
}

/// The parameters extracted by a route match.
///
/// The list is ordered: the first parameter of the pattern is the first
/// element, so values may also be read by index.
///
/// ```rust
/// use http::Method;
/// use trellis::Router;
///
/// # fn main() -> Result<(), trellis::MatchError> {
/// let mut router = Router::new();
/// router.add_route(Method::GET, "/users/:id", |_ctx| {});
///
/// let matched = router.resolve(&Method::GET, "/users/1")?;
/// assert_eq!(matched.params.get("id"), Some("1"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Params(Vec<Param>);

impl Params {
    pub fn new() -> Params {
        Params(Vec::new())
    }

    /// Returns the value of the first parameter registered under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|param| param.key == key)
            .map(|param| param.value.as_str())
    }

    /// Returns an iterator over `(key, value)` pairs, in pattern order.
    pub fn iter(&self) -> ParamsIter<'_> {
        ParamsIter(self.0.iter())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn push(&mut self, key: &str, value: &str) {
        self.0.push(Param::new(key, value));
    }
}

impl Index<usize> for Params {
    type Output = str;

    fn index(&self, i: usize) -> &Self::Output {
        &self.0[i].value
    }
}

impl<'ps> IntoIterator for &'ps Params {
    type Item = (&'ps str, &'ps str);
    type IntoIter = ParamsIter<'ps>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the keys and values of matched [`Params`].
pub struct ParamsIter<'ps>(slice::Iter<'ps, Param>);

impl<'ps> Iterator for ParamsIter<'ps> {
    type Item = (&'ps str, &'ps str);

    fn next(&mut self) -> Option<Self::Item> {
        self.0
            .next()
            .map(|param| (param.key.as_str(), param.value.as_str()))
    }
}

impl ExactSizeIterator for ParamsIter<'_> {
    fn len(&self) -> usize {
        self.0.len()
    }
}
