//! Admin menu.
//!
//! Opened by entering the admin code at the lock prompt. Four options cycle
//! with `C`; `A` runs the selected one and `B` leaves the menu.
//!
//! | Option | Keys inside |
//! |---|---|
//! | View | `*`/`#` previous/next code, `B` back |
//! | Add | code entry, then `A`/`B` to add another |
//! | Remove | `*`/`#` move, `A` mark, `B` unmark, `C` commit |
//! | Clear | `A` confirm, `B` cancel |
//!
//! Every flow that can leave the store empty (remove, clear) asks for one
//! replacement code before returning, so the lock always has a code that
//! opens it.

use lockpad_core::{Code, Symbol, format_decimal};
use lockpad_hardware::traits::{DisplayDevice, FeedbackDevice, KeypadDevice};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::Timings;
use crate::entry::{CodeEntry, EntryMode};
use crate::error::Result;
use crate::peripherals::Peripherals;
use crate::store::{PasscodeStore, RemovalMarks};

const MENU_HINT: &str = "A=SEL B=EXIT C=NEXT";
const STORE_FULL: &str = "MAX CODES REACHED";
const NEW_CODE_PROMPT: &str = "ENTER NEW CODE";
const REPLACEMENT_PROMPT: &str = "SELECT PASSCODE";

/// One entry of the admin menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuOption {
    View,
    Add,
    Remove,
    Clear,
}

impl MenuOption {
    /// Options in menu order.
    pub const ALL: [MenuOption; 4] = [
        MenuOption::View,
        MenuOption::Add,
        MenuOption::Remove,
        MenuOption::Clear,
    ];

    /// The following option, wrapping from `Clear` to `View`.
    pub fn next(self) -> Self {
        match self {
            MenuOption::View => MenuOption::Add,
            MenuOption::Add => MenuOption::Remove,
            MenuOption::Remove => MenuOption::Clear,
            MenuOption::Clear => MenuOption::View,
        }
    }

    /// Line 1 text while the option is selected.
    pub fn label(self) -> &'static str {
        match self {
            MenuOption::View => "VIEW CODES",
            MenuOption::Add => "ADD CODE",
            MenuOption::Remove => "REMOVE CODES",
            MenuOption::Clear => "CLEAR CODES",
        }
    }
}

/// Two-digit field used by every counter the menu shows.
fn two_digits(value: usize) -> String {
    format_decimal(u32::try_from(value).unwrap_or(u32::MAX), 2)
}

/// Carousel position label: `CODE nn/mm`, 1-based.
fn position_label(index: usize, total: usize) -> String {
    format!("CODE {}/{}", two_digits(index + 1), two_digits(total))
}

fn previous(index: usize, len: usize) -> usize {
    (index + len - 1) % len
}

fn next(index: usize, len: usize) -> usize {
    (index + 1) % len
}

/// A running admin menu session.
///
/// Borrows the lock's devices and store for the duration of the session.
#[derive(Debug)]
pub struct AdminMenu<'a, K, D, F> {
    io: &'a mut Peripherals<K, D, F>,
    store: &'a mut PasscodeStore,
    timings: &'a Timings,
    selection: MenuOption,
}

impl<'a, K, D, F> AdminMenu<'a, K, D, F>
where
    K: KeypadDevice,
    D: DisplayDevice,
    F: FeedbackDevice,
{
    pub fn new(
        io: &'a mut Peripherals<K, D, F>,
        store: &'a mut PasscodeStore,
        timings: &'a Timings,
    ) -> Self {
        Self {
            io,
            store,
            timings,
            selection: MenuOption::View,
        }
    }

    /// Currently highlighted option.
    pub fn selection(&self) -> MenuOption {
        self.selection
    }

    /// Show the menu and dispatch keys until `B`.
    ///
    /// # Errors
    ///
    /// Returns an error only if a device fails.
    pub async fn run(&mut self) -> Result<()> {
        info!("Admin menu opened");
        loop {
            self.io
                .display
                .show(self.selection.label(), MENU_HINT)
                .await?;

            match self.io.keypad.read_symbol().await? {
                Symbol::C => self.selection = self.selection.next(),
                Symbol::A => {
                    debug!("Admin menu: {:?} selected", self.selection);
                    match self.selection {
                        MenuOption::View => self.view().await?,
                        MenuOption::Add => self.add().await?,
                        MenuOption::Remove => self.remove().await?,
                        MenuOption::Clear => self.clear().await?,
                    }
                }
                Symbol::B => {
                    info!("Admin menu closed, {} codes stored", self.store.len());
                    return Ok(());
                }
                _ => {}
            }
        }
    }

    /// Read-only carousel over the stored codes.
    pub async fn view(&mut self) -> Result<()> {
        let len = self.store.len();
        if len == 0 {
            return Ok(());
        }
        let mut index = 0;
        loop {
            let Some(code) = self.store.get(index).copied() else {
                return Ok(());
            };
            self.io
                .display
                .show(&position_label(index, len), &code.to_string())
                .await?;

            match self.io.keypad.read_symbol().await? {
                Symbol::Star => index = previous(index, len),
                Symbol::Hash => index = next(index, len),
                Symbol::B => return Ok(()),
                _ => {}
            }
        }
    }

    /// Add codes until the user declines or the store fills up.
    pub async fn add(&mut self) -> Result<()> {
        loop {
            if self.store.is_full() {
                self.io
                    .notice(STORE_FULL, "", self.timings.notice())
                    .await?;
                return Ok(());
            }

            let code = self.prompt_code(NEW_CODE_PROMPT).await?;
            let count = self.store.add(code)?;
            let total = format!(
                "TOTAL: {}/{}",
                two_digits(count),
                two_digits(self.store.capacity())
            );
            self.io.notice(&total, "", self.timings.notice()).await?;

            if self.store.is_full() {
                self.io
                    .notice(STORE_FULL, "", self.timings.notice())
                    .await?;
                return Ok(());
            }
            if !self.io.confirm("ADD ANOTHER?").await? {
                return Ok(());
            }
        }
    }

    /// Mark codes for removal, then remove them all on `C`.
    pub async fn remove(&mut self) -> Result<()> {
        let len = self.store.len();
        if len == 0 {
            return Ok(());
        }
        let mut marks = RemovalMarks::for_store(self.store);
        let mut index = 0;
        loop {
            let Some(code) = self.store.get(index).copied() else {
                return Ok(());
            };
            let flag = if marks.is_marked(index) { "[X]" } else { "[ ]" };
            self.io
                .display
                .show(
                    &format!("{} {}", position_label(index, len), flag),
                    &code.to_string(),
                )
                .await?;

            match self.io.keypad.read_symbol().await? {
                Symbol::Star => index = previous(index, len),
                Symbol::Hash => index = next(index, len),
                Symbol::A => marks.mark(index),
                Symbol::B => marks.unmark(index),
                Symbol::C => break,
                _ => {}
            }
        }

        let removing = format!("REMOVING: {} CODES", two_digits(marks.count()));
        self.io.notice(&removing, "", self.timings.notice()).await?;

        let mut pruned = self.store.clone();
        let summary = pruned.remove(&marks);
        if !summary.needs_replacement() {
            *self.store = pruned;
        }
        let removed = format!("REMOVED {} CODES", two_digits(summary.removed));
        self.io.notice(&removed, "", self.timings.notice()).await?;

        if summary.needs_replacement() {
            // The old codes stay in place until the replacement is read.
            warn!("Every code removed, asking for a replacement");
            let code = self.prompt_code(REPLACEMENT_PROMPT).await?;
            self.store.replace_all(code);
        }
        Ok(())
    }

    /// Replace every code with one new code, after confirmation.
    pub async fn clear(&mut self) -> Result<()> {
        if !self.io.confirm("CLEAR ALL CODES?").await? {
            return Ok(());
        }
        let code = self.prompt_code(REPLACEMENT_PROMPT).await?;
        self.store.replace_all(code);
        info!("All codes cleared");
        Ok(())
    }

    /// Show `heading` with an empty line 2 and read a new code there.
    async fn prompt_code(&mut self, heading: &str) -> Result<Code> {
        self.io.display.show(heading, "").await?;
        CodeEntry::new(EntryMode::Create, *self.store.admin_code())
            .with_hold(self.timings.notice())
            .read(self.io)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockpad_hardware::VirtualDisplay;
    use lockpad_hardware::mock::{MockFeedback, MockKeypad};
    use rstest::rstest;

    type TestIo = Peripherals<MockKeypad, VirtualDisplay, MockFeedback>;

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

    fn io(keys: &str) -> TestIo {
        Peripherals::new(
            MockKeypad::scripted(keys).unwrap(),
            VirtualDisplay::new(),
            MockFeedback::new(),
        )
    }

    fn contents(store: &PasscodeStore) -> Vec<String> {
        store.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_option_cycle_wraps() {
        let mut option = MenuOption::View;
        for expected in [
            MenuOption::Add,
            MenuOption::Remove,
            MenuOption::Clear,
            MenuOption::View,
        ] {
            option = option.next();
            assert_eq!(option, expected);
        }
    }

    #[rstest]
    #[case(0, 3, "CODE 01/03")]
    #[case(9, 12, "CODE 10/12")]
    fn test_position_label(#[case] index: usize, #[case] total: usize, #[case] expected: &str) {
        assert_eq!(position_label(index, total), expected);
    }

    #[test]
    fn test_carousel_wraps_both_ways() {
        assert_eq!(next(2, 3), 0);
        assert_eq!(previous(0, 3), 2);
        assert_eq!(previous(0, 1), 0);
    }

    #[tokio::test]
    async fn test_menu_exit_on_b() {
        let mut io = io("1*#B");
        let mut store = store_of(&["1234"], 5);
        let timings = Timings::default();

        let mut menu = AdminMenu::new(&mut io, &mut store, &timings);
        menu.run().await.unwrap();
        assert_eq!(menu.selection(), MenuOption::View);
        assert_eq!(io.display.lines(), vec!["VIEW CODES", MENU_HINT]);
    }

    #[tokio::test]
    async fn test_menu_c_advances_selection() {
        let mut io = io("CCC");
        let mut store = store_of(&["1234"], 5);
        let timings = Timings::default();

        let mut menu = AdminMenu::new(&mut io, &mut store, &timings);
        assert!(menu.run().await.is_err());
        assert_eq!(menu.selection(), MenuOption::Clear);
    }

    #[tokio::test]
    async fn test_view_carousel() {
        let mut io = io("#");
        let mut store = store_of(&["1234", "5678"], 5);
        let timings = Timings::default();

        let result = AdminMenu::new(&mut io, &mut store, &timings).view().await;
        assert!(result.unwrap_err().is_hardware());
        assert_eq!(io.display.lines(), vec!["CODE 02/02", "5678"]);
    }

    #[tokio::test]
    async fn test_view_star_wraps_to_last() {
        let mut io = io("*B");
        let mut store = store_of(&["1111", "2222", "3333"], 5);
        let timings = Timings::default();

        AdminMenu::new(&mut io, &mut store, &timings)
            .view()
            .await
            .unwrap();
        assert!(io.display.written().contains("CODE 03/033333"));
    }

    #[tokio::test]
    async fn test_add_one_then_decline() {
        let mut io = io("5678A B");
        let mut store = store_of(&["1234"], 5);
        let timings = Timings::default();

        AdminMenu::new(&mut io, &mut store, &timings)
            .add()
            .await
            .unwrap();

        assert_eq!(contents(&store), vec!["1234", "5678"]);
        let written = io.display.written();
        assert!(written.contains("TOTAL: 02/05"));
        assert!(written.contains("ADD ANOTHER?A=YES B=NO"));
    }

    #[tokio::test]
    async fn test_add_another_ignores_other_keys() {
        let mut io = io("1111A 7C A 2222A B");
        let mut store = store_of(&["1234"], 5);
        let timings = Timings::default();

        AdminMenu::new(&mut io, &mut store, &timings)
            .add()
            .await
            .unwrap();
        assert_eq!(contents(&store), vec!["1234", "1111", "2222"]);
    }

    #[tokio::test]
    async fn test_add_when_full_shows_notice() {
        let mut io = io("");
        let mut store = store_of(&["1111", "2222"], 2);
        let timings = Timings::default();

        AdminMenu::new(&mut io, &mut store, &timings)
            .add()
            .await
            .unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(io.display.text(0), STORE_FULL);
    }

    #[tokio::test]
    async fn test_add_stops_when_store_fills() {
        let mut io = io("2222A");
        let mut store = store_of(&["1111"], 2);
        let timings = Timings::default();

        AdminMenu::new(&mut io, &mut store, &timings)
            .add()
            .await
            .unwrap();

        assert!(store.is_full());
        assert_eq!(io.display.text(0), STORE_FULL);
        assert!(!io.display.written().contains("ADD ANOTHER?"));
    }

    #[tokio::test]
    async fn test_add_refuses_admin_code_inline() {
        let mut io = io("2580A 4444A B");
        let mut store = store_of(&["1234"], 5);
        let timings = Timings::default();

        AdminMenu::new(&mut io, &mut store, &timings)
            .add()
            .await
            .unwrap();
        assert_eq!(contents(&store), vec!["1234", "4444"]);
    }

    #[tokio::test]
    async fn test_remove_marked_codes() {
        // Mark the first and third, mark-then-unmark the second, commit.
        let mut io = io("A # A B # A C");
        let mut store = store_of(&["1111", "2222", "3333"], 5);
        let timings = Timings::default();

        AdminMenu::new(&mut io, &mut store, &timings)
            .remove()
            .await
            .unwrap();

        assert_eq!(contents(&store), vec!["2222"]);
        let written = io.display.written();
        assert!(written.contains("REMOVING: 02 CODES"));
        assert!(written.contains("REMOVED 02 CODES"));
    }

    #[tokio::test]
    async fn test_remove_renders_mark_state() {
        let mut io = io("A");
        let mut store = store_of(&["1111", "2222"], 5);
        let timings = Timings::default();

        let result = AdminMenu::new(&mut io, &mut store, &timings).remove().await;
        assert!(result.is_err());
        assert_eq!(io.display.lines(), vec!["CODE 01/02 [X]", "1111"]);
    }

    #[tokio::test]
    async fn test_remove_commit_without_marks_keeps_store() {
        let mut io = io("C");
        let mut store = store_of(&["1111", "2222"], 5);
        let timings = Timings::default();

        AdminMenu::new(&mut io, &mut store, &timings)
            .remove()
            .await
            .unwrap();
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn test_remove_all_keeps_codes_until_replacement_read() {
        // The keypad goes away at the replacement prompt.
        let mut io = io("A # A C");
        let mut store = store_of(&["1111", "2222"], 5);
        let timings = Timings::default();

        let err = AdminMenu::new(&mut io, &mut store, &timings)
            .remove()
            .await
            .unwrap_err();

        assert!(err.is_hardware());
        assert_eq!(contents(&store), vec!["1111", "2222"]);
        assert_eq!(io.display.lines(), vec![REPLACEMENT_PROMPT, ""]);
    }

    #[tokio::test]
    async fn test_remove_all_prompts_for_replacement() {
        let mut io = io("A # A C 9999A");
        let mut store = store_of(&["1111", "2222"], 5);
        let timings = Timings::default();

        AdminMenu::new(&mut io, &mut store, &timings)
            .remove()
            .await
            .unwrap();

        assert_eq!(contents(&store), vec!["9999"]);
        assert_eq!(io.display.lines(), vec![REPLACEMENT_PROMPT, "****"]);
    }

    #[rstest]
    #[case("A 7777A", &["7777"])]
    #[case("B", &["1111", "2222"])]
    #[case("5 D B", &["1111", "2222"])]
    #[tokio::test]
    async fn test_clear(#[case] keys: &str, #[case] expected: &[&str]) {
        let mut io = io(keys);
        let mut store = store_of(&["1111", "2222"], 5);
        let timings = Timings::default();

        AdminMenu::new(&mut io, &mut store, &timings)
            .clear()
            .await
            .unwrap();
        assert_eq!(contents(&store), expected);
    }

    #[tokio::test]
    async fn test_menu_dispatches_and_redraws() {
        // C → ADD, A runs it (add 3333, decline), then B exits.
        let mut io = io("C A 3333A B B");
        let mut store = store_of(&["1234"], 5);
        let timings = Timings::default();

        let mut menu = AdminMenu::new(&mut io, &mut store, &timings);
        menu.run().await.unwrap();
        assert_eq!(menu.selection(), MenuOption::Add);

        assert_eq!(contents(&store), vec!["1234", "3333"]);
        assert_eq!(io.display.lines(), vec!["ADD CODE", MENU_HINT]);
    }
}
