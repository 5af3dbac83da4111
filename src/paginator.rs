use std::{fmt, slice};

/// One page of a [`Paginator`]
#[derive(Debug)]
pub struct Page<'a, T> {
    items: &'a [T],
}

impl<'a, T> Page<'a, T> {
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'a, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &'a [T] {
        self.items
    }
}

impl<'a, T> IntoIterator for Page<'a, T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Items written back to back
impl<T: fmt::Display> fmt::Display for Page<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in self.items {
            write!(f, "{}", item)?;
        }
        Ok(())
    }
}

/// Fixed-size pages over a slice
/// Every page holds `page_size` items except possibly the last one.
#[derive(Debug)]
pub struct Paginator<'a, T> {
    pages: Vec<Page<'a, T>>,
}

impl<'a, T> Paginator<'a, T> {
    /// A `page_size` of 0 is treated as 1.
    pub fn new(items: &'a [T], page_size: usize) -> Self {
        let pages = items
            .chunks(page_size.max(1))
            .map(|items| Page { items })
            .collect();
        Self { pages }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Page<'a, T>> {
        self.pages.get(index)
    }

    pub fn iter(&self) -> slice::Iter<'_, Page<'a, T>> {
        self.pages.iter()
    }
}

impl<'p, 'a, T> IntoIterator for &'p Paginator<'a, T> {
    type Item = &'p Page<'a, T>;
    type IntoIter = slice::Iter<'p, Page<'a, T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.iter()
    }
}

/// Split `items` into pages of `page_size`
pub fn paginate<T>(items: &[T], page_size: usize) -> Paginator<'_, T> {
    Paginator::new(items, page_size)
}
