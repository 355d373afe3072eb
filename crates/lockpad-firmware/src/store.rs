//! Passcode store.
//!
//! A bounded, insertion-ordered list of 4-symbol codes plus the admin code,
//! which is held alongside but never stored in the list. Removal compacts the
//! survivors toward the front, keeping their relative order.
//!
//! Outside of boot and the moment inside a remove or clear flow when it has
//! just been emptied, the store always holds at least one code. Restoring
//! that is the caller's job: [`RemovalSummary::needs_replacement`] says when
//! the flow has to ask for a fresh code and call
//! [`PasscodeStore::replace_all`].
//!
//! ```
//! use lockpad_firmware::store::{CheckResult, PasscodeStore};
//!
//! let admin = "2580".parse()?;
//! let mut store = PasscodeStore::with_initial(5, admin, "1234".parse()?)?;
//! store.add("5678".parse()?)?;
//!
//! assert_eq!(store.check(&"5678".parse()?), CheckResult::Match { index: 1 });
//! assert_eq!(store.check(&"2580".parse()?), CheckResult::Admin);
//! assert_eq!(store.check(&"0000".parse()?), CheckResult::NoMatch);
//! # Ok::<(), lockpad_core::Error>(())
//! ```

use lockpad_core::{Code, Error, Result};
use tracing::debug;

/// Outcome of checking an entered code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckResult {
    /// The entry is the admin code.
    Admin,
    /// The entry equals the stored code at `index` (the first such code).
    Match { index: usize },
    /// Neither admin nor stored.
    NoMatch,
}

/// Bounded ordered collection of accepted passcodes.
#[derive(Debug, Clone)]
pub struct PasscodeStore {
    codes: Vec<Code>,
    capacity: usize,
    admin_code: Code,
}

impl PasscodeStore {
    /// Create an empty store. Used before boot has collected the first code.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize, admin_code: Code) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity(capacity));
        }
        Ok(Self {
            codes: Vec::with_capacity(capacity),
            capacity,
            admin_code,
        })
    }

    /// Create a store seeded with one code.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCapacity`] if `capacity` is zero.
    pub fn with_initial(capacity: usize, admin_code: Code, initial: Code) -> Result<Self> {
        let mut store = Self::new(capacity, admin_code)?;
        store.codes.push(initial);
        Ok(store)
    }

    /// Append a code. Duplicates are accepted.
    ///
    /// Returns the new count.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StoreFull`] without touching the store when it is at
    /// capacity.
    pub fn add(&mut self, code: Code) -> Result<usize> {
        if self.is_full() {
            return Err(Error::StoreFull {
                capacity: self.capacity,
            });
        }
        self.codes.push(code);
        debug!("Code added, {}/{} stored", self.codes.len(), self.capacity);
        Ok(self.codes.len())
    }

    /// Classify an entry. The admin code is checked first, so a stored copy
    /// of it can never be reported as a match.
    pub fn check(&self, entry: &Code) -> CheckResult {
        if *entry == self.admin_code {
            return CheckResult::Admin;
        }
        match self.codes.iter().position(|code| code == entry) {
            Some(index) => CheckResult::Match { index },
            None => CheckResult::NoMatch,
        }
    }

    /// Remove every marked entry, compacting the rest leftward.
    ///
    /// Marks past the end of the store are ignored. Removal runs from the
    /// highest marked index down, one shift per removed entry, so survivors
    /// keep their relative order.
    pub fn remove(&mut self, marks: &RemovalMarks) -> RemovalSummary {
        let mut removed = 0;
        for index in (0..self.codes.len()).rev() {
            if marks.is_marked(index) {
                self.codes.remove(index);
                removed += 1;
            }
        }
        debug!("Removed {} codes, {} remain", removed, self.codes.len());
        RemovalSummary {
            removed,
            remaining: self.codes.len(),
        }
    }

    /// Discard every stored code and keep only `code`.
    pub fn replace_all(&mut self, code: Code) {
        self.codes.clear();
        self.codes.push(code);
        debug!("Store reset to a single code");
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.codes.len() >= self.capacity
    }

    /// Code at `index`, in insertion order.
    pub fn get(&self, index: usize) -> Option<&Code> {
        self.codes.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Code> {
        self.codes.iter()
    }

    pub fn admin_code(&self) -> &Code {
        &self.admin_code
    }
}

/// Per-entry removal marks for one remove session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalMarks {
    marks: Vec<bool>,
}

impl RemovalMarks {
    /// Unmarked set sized to the store's current contents.
    pub fn for_store(store: &PasscodeStore) -> Self {
        Self {
            marks: vec![false; store.len()],
        }
    }

    /// Mark `index`. Out-of-range indices are ignored.
    pub fn mark(&mut self, index: usize) {
        if let Some(mark) = self.marks.get_mut(index) {
            *mark = true;
        }
    }

    /// Clear the mark on `index`. Out-of-range indices are ignored.
    pub fn unmark(&mut self, index: usize) {
        if let Some(mark) = self.marks.get_mut(index) {
            *mark = false;
        }
    }

    pub fn is_marked(&self, index: usize) -> bool {
        self.marks.get(index).copied().unwrap_or(false)
    }

    /// Number of marked entries.
    pub fn count(&self) -> usize {
        self.marks.iter().filter(|&&mark| mark).count()
    }

    /// Number of entries covered by the set.
    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }
}

/// What a [`PasscodeStore::remove`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemovalSummary {
    pub removed: usize,
    pub remaining: usize,
}

impl RemovalSummary {
    /// The store was emptied and must be given a replacement code before the
    /// flow returns.
    pub fn needs_replacement(&self) -> bool {
        self.remaining == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn code(s: &str) -> Code {
        s.parse().unwrap()
    }

    fn store_of(codes: &[&str], capacity: usize) -> PasscodeStore {
        let mut store = PasscodeStore::new(capacity, code("2580")).unwrap();
        for c in codes {
            store.add(code(c)).unwrap();
        }
        store
    }

    fn contents(store: &PasscodeStore) -> Vec<String> {
        store.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert_eq!(
            PasscodeStore::new(0, code("2580")).unwrap_err(),
            Error::InvalidCapacity(0)
        );
    }

    #[test]
    fn test_with_initial_holds_one_code() {
        let store = PasscodeStore::with_initial(5, code("2580"), code("1234")).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(0), Some(&code("1234")));
        assert_eq!(store.admin_code(), &code("2580"));
    }

    #[test]
    fn test_add_until_full() {
        let mut store = store_of(&["1111"], 3);
        assert_eq!(store.add(code("2222")).unwrap(), 2);
        assert_eq!(store.add(code("3333")).unwrap(), 3);
        assert!(store.is_full());

        let err = store.add(code("4444")).unwrap_err();
        assert_eq!(err, Error::StoreFull { capacity: 3 });
        assert_eq!(contents(&store), vec!["1111", "2222", "3333"]);
    }

    #[test]
    fn test_duplicates_allowed() {
        let mut store = store_of(&["1111"], 3);
        store.add(code("1111")).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.check(&code("1111")), CheckResult::Match { index: 0 });
    }

    #[test]
    fn test_admin_wins_over_stored_copy() {
        let store = store_of(&["2580", "1234"], 5);
        assert_eq!(store.check(&code("2580")), CheckResult::Admin);
        assert_eq!(store.check(&code("1234")), CheckResult::Match { index: 1 });
    }

    #[test]
    fn test_partial_match_is_no_match() {
        let store = store_of(&["1234"], 5);
        assert_eq!(store.check(&code("1235")), CheckResult::NoMatch);
        assert_eq!(store.check(&code("0234")), CheckResult::NoMatch);
    }

    #[rstest]
    #[case(&[0], &["b", "c", "d", "e"])]
    #[case(&[4], &["a", "b", "c", "d"])]
    #[case(&[1, 3], &["a", "c", "e"])]
    #[case(&[0, 2, 4], &["b", "d"])]
    #[case(&[], &["a", "b", "c", "d", "e"])]
    fn test_remove_compacts_in_order(#[case] marked: &[usize], #[case] expected: &[&str]) {
        let names = ["a", "b", "c", "d", "e"];
        let codes = ["1111", "2222", "3333", "4444", "5555"];
        let mut store = store_of(&codes, 5);
        let mut marks = RemovalMarks::for_store(&store);
        for &index in marked {
            marks.mark(index);
        }

        let summary = store.remove(&marks);

        let expected: Vec<String> = expected
            .iter()
            .map(|name| {
                let position = names.iter().position(|n| n == name).unwrap();
                codes[position].to_string()
            })
            .collect();
        assert_eq!(contents(&store), expected);
        assert_eq!(summary.removed, marked.len());
        assert_eq!(summary.remaining, 5 - marked.len());
        assert!(!summary.needs_replacement());
    }

    #[test]
    fn test_remove_all_needs_replacement() {
        let mut store = store_of(&["1111", "2222"], 5);
        let mut marks = RemovalMarks::for_store(&store);
        marks.mark(0);
        marks.mark(1);

        let summary = store.remove(&marks);
        assert!(summary.needs_replacement());
        assert!(store.is_empty());

        store.replace_all(code("9999"));
        assert_eq!(contents(&store), vec!["9999"]);
    }

    #[test]
    fn test_replace_all_discards_everything() {
        let mut store = store_of(&["1111", "2222", "3333"], 5);
        store.replace_all(code("4321"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.check(&code("1111")), CheckResult::NoMatch);
        assert_eq!(store.check(&code("4321")), CheckResult::Match { index: 0 });
    }

    #[test]
    fn test_marks_toggle_and_bounds() {
        let store = store_of(&["1111", "2222"], 5);
        let mut marks = RemovalMarks::for_store(&store);
        assert_eq!(marks.len(), 2);

        marks.mark(1);
        marks.mark(7);
        assert_eq!(marks.count(), 1);
        assert!(marks.is_marked(1));
        assert!(!marks.is_marked(7));

        marks.unmark(1);
        assert_eq!(marks.count(), 0);
    }
}
