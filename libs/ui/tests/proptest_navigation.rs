//! Property tests for index-based navigation.

use handset_ui::test_utils::{FixedPower, RecordingDisplay, TestPage};
use handset_ui::{ChromeSettings, Page, PageId, PageManager, UiManager};
use proptest::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

fn manager_with(count: usize) -> (PageManager<RecordingDisplay>, Vec<Rc<RefCell<TestPage>>>) {
    let mut pm = PageManager::new(UiManager::without_touch(), ChromeSettings::default());
    pm.init(Some(Rc::new(FixedPower::new(50, false)))).unwrap();
    let pages: Vec<_> = (0..count)
        .map(|i| Rc::new(RefCell::new(TestPage::new(&format!("Page {i}")))))
        .collect();
    for (id, page) in (0u16..).zip(pages.iter()) {
        // Ids in reverse order so position and id never coincide.
        pm.add_page(page.clone(), PageId(1000 - id)).unwrap();
    }
    (pm, pages)
}

proptest! {
    /// next then previous restores the current page, including at both ends
    #[test]
    fn next_then_previous_round_trips(count in 1usize..12, start in 0usize..12) {
        let start = start % count;
        let (mut pm, _pages) = manager_with(count);
        pm.show_page_by_index(start).unwrap();
        let before = pm.current_page_id();

        pm.next_page().unwrap();
        pm.previous_page().unwrap();
        prop_assert_eq!(pm.current_page_id(), before);

        pm.previous_page().unwrap();
        pm.next_page().unwrap();
        prop_assert_eq!(pm.current_page_id(), before);
    }

    /// count calls to next_page visit every page once and come back
    #[test]
    fn full_cycle_returns_to_start(count in 1usize..12, start in 0usize..12) {
        let start = start % count;
        let (mut pm, pages) = manager_with(count);
        pm.show_page_by_index(start).unwrap();
        let before = pm.current_index();
        for _ in 0..count {
            pm.next_page().unwrap();
            let visible = pages.iter().filter(|p| p.borrow().core().is_visible()).count();
            prop_assert_eq!(visible, 1);
        }
        prop_assert_eq!(pm.current_index(), before);
        for page in &pages {
            prop_assert_eq!(page.borrow().builds, 1);
        }
    }
}
