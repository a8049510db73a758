//! Decides which background page each output page is drawn over.
//!
//! With a real background document and insertions:
//!
//! | output | background | inserted | synthetic |
//! |--------|------------|----------|-----------|
//! | 0      | 0          | no       | no        |
//! | 1      | 0          | yes      | yes       |
//! | 2      | 1          | no       | no        |

use crate::error::CompositionError;

/// The page counts and redirection table of a bundle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageMetadata {
    pub original_page_count: usize,
    pub page_count: usize,
    /// One entry per output page; `-1` marks an inserted page.
    pub redirection: Option<Vec<i32>>,
}

/// The background choice for one output page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePlanEntry {
    pub output_index: usize,
    /// 0-indexed page of the real background document, or of the template
    /// when `is_synthetic_background` is set.
    pub background_index: usize,
    pub is_inserted: bool,
    pub is_synthetic_background: bool,
}

#[derive(Debug, Clone)]
pub struct PageComposer {
    metadata: PageMetadata,
    has_background: bool,
}

impl PageComposer {
    /// `has_background` says whether the bundle carries a real background
    /// document. An empty redirection table counts as absent.
    pub fn new(mut metadata: PageMetadata, has_background: bool) -> Result<Self, CompositionError> {
        if metadata.redirection.as_ref().is_some_and(|r| r.is_empty()) {
            metadata.redirection = None;
        }
        if let Some(redirection) = &metadata.redirection
            && redirection.len() != metadata.page_count
        {
            return Err(CompositionError::RedirectionLengthMismatch {
                expected: metadata.page_count,
                found: redirection.len(),
            });
        }
        Ok(Self {
            metadata,
            has_background,
        })
    }

    pub fn len(&self) -> usize {
        self.metadata.page_count
    }

    pub fn is_empty(&self) -> bool {
        self.metadata.page_count == 0
    }

    pub fn has_background(&self) -> bool {
        self.has_background
    }

    /// The plan entry for output page `index`, independent of any other
    /// query.
    pub fn entry(&self, index: usize) -> Option<PagePlanEntry> {
        if index >= self.metadata.page_count {
            return None;
        }

        if !self.has_background {
            return Some(PagePlanEntry {
                output_index: index,
                background_index: 0,
                is_inserted: false,
                is_synthetic_background: true,
            });
        }

        let Some(redirection) = &self.metadata.redirection else {
            return Some(real_page(index, index));
        };

        if redirection[index] == -1 {
            return Some(PagePlanEntry {
                output_index: index,
                background_index: 0,
                is_inserted: true,
                is_synthetic_background: true,
            });
        }

        if self.metadata.page_count != self.metadata.original_page_count {
            let inserted_so_far = redirection[..=index].iter().filter(|&&r| r == -1).count();
            return Some(real_page(index, index - inserted_so_far));
        }

        Some(real_page(index, index))
    }

    pub fn iter(&self) -> impl Iterator<Item = PagePlanEntry> + '_ {
        (0..self.len()).filter_map(|i| self.entry(i))
    }

    pub fn plan(&self) -> Vec<PagePlanEntry> {
        self.iter().collect()
    }

    /// 0-indexed output positions marked as inserted in the redirection
    /// table.
    pub fn inserted_pages(&self) -> Vec<usize> {
        self.metadata
            .redirection
            .iter()
            .flatten()
            .enumerate()
            .filter(|&(_, &r)| r == -1)
            .map(|(i, _)| i)
            .collect()
    }
}

fn real_page(output_index: usize, background_index: usize) -> PagePlanEntry {
    PagePlanEntry {
        output_index,
        background_index,
        is_inserted: false,
        is_synthetic_background: false,
    }
}

/// Formats 0-indexed pages as 1-indexed prose: `"2"`, `"2 and 4"`,
/// `"2, 4 and 6"`.
pub fn format_page_list(indices: &[usize]) -> String {
    let numbers: Vec<String> = indices.iter().map(|i| (i + 1).to_string()).collect();
    match numbers.split_last() {
        None => String::new(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} and {}", rest.join(", "), last),
    }
}
