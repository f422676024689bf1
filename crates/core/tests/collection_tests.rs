// ═══════════════════════════════════════════════════════════════════
// Collection Tests: edit state machine, aggregates, backend sync
// ═══════════════════════════════════════════════════════════════════

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{d, shared, MockGateway, Reply};
use serde_json::json;

use finance_tracker_core::collection::board::IncomeBoard;
use finance_tracker_core::collection::editable::{EditableCollection, NEW_ENTRY_LABEL};
use finance_tracker_core::collection::entry::{CollectionEntry, EntryId, ItemState};
use finance_tracker_core::errors::CoreError;
use finance_tracker_core::models::domain::{EntryDomain, RecordId};
use finance_tracker_core::services::entry_service::EntryService;
use finance_tracker_core::services::normalizer::Normalizer;
use finance_tracker_core::services::palette_service::{PaletteService, INCOME_PALETTE};
use finance_tracker_core::storage::memory::MemoryStore;

fn pay_check() -> EditableCollection {
    EditableCollection::from_entries(vec![CollectionEntry::new(1, "Pay Check", 5000.0, "#3B82F6")])
}

fn board_on(gw: &Arc<MockGateway>) -> (IncomeBoard, Arc<PaletteService>) {
    let palette = Arc::new(PaletteService::new(Arc::new(MemoryStore::new())));
    let normalizer = Arc::new(Normalizer::new(palette.clone()).with_fixed_date(d(2025, 3, 14)));
    let service = EntryService::income(shared(gw), normalizer);
    (IncomeBoard::new(service, palette.clone()), palette)
}

// ═══════════════════════════════════════════════════════════════════
//  Add / Delete
// ═══════════════════════════════════════════════════════════════════

mod add_delete {
    use super::*;

    #[test]
    fn add_appends_zero_amount_placeholder() {
        let mut c = pay_check();
        let scroll = c.add();

        assert_eq!(c.len(), 2);
        let added = c.get(&scroll.entry).unwrap();
        assert_eq!(added.label, NEW_ENTRY_LABEL);
        assert_eq!(added.amount, 0.0);
        assert!(added.id.is_pending());
        assert_eq!(c.entries().last().unwrap().id, scroll.entry);
    }

    #[test]
    fn add_picks_hue_by_next_position() {
        let mut c = EditableCollection::new();
        let hues: Vec<String> = (0..6)
            .map(|_| {
                let id = c.add().entry;
                c.get(&id).unwrap().color.clone()
            })
            .collect();
        assert_eq!(
            hues,
            vec![
                "hsl(30, 85%, 60%)",
                "hsl(120, 85%, 60%)",
                "hsl(270, 85%, 60%)",
                "hsl(180, 85%, 60%)",
                "hsl(210, 85%, 60%)",
                "hsl(30, 85%, 60%)",
            ]
        );
    }

    #[test]
    fn add_requests_delayed_scroll() {
        let mut c = EditableCollection::new();
        assert_eq!(c.add().delay, Duration::from_millis(100));
    }

    #[test]
    fn pending_ids_are_unique() {
        let mut c = EditableCollection::new();
        let a = c.add().entry;
        let b = c.add().entry;
        assert_ne!(a, b);
        assert!(a.to_string().starts_with("pending-"));
    }

    #[test]
    fn delete_removes_exactly_one() {
        let mut c = pay_check();
        c.add();
        let (idx, removed) = c.delete(&EntryId::from(1)).unwrap();
        assert_eq!(idx, 0);
        assert_eq!(removed.label, "Pay Check");
        assert_eq!(c.len(), 1);
        assert!(c.get(&EntryId::from(1)).is_none());
    }

    #[test]
    fn delete_unknown_is_not_found() {
        let mut c = pay_check();
        let err = c.delete(&EntryId::from(99)).unwrap_err();
        assert!(matches!(err, CoreError::RecordNotFound(_)));
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn restore_puts_entry_back_in_place() {
        let mut c = pay_check();
        c.add();
        let (idx, removed) = c.delete(&EntryId::from(1)).unwrap();
        c.restore(idx, removed);
        assert_eq!(c.entries()[0].label, "Pay Check");
        assert_eq!(c.len(), 2);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Edit state machine
// ═══════════════════════════════════════════════════════════════════

mod editing {
    use super::*;

    #[test]
    fn begin_edit_captures_current_values() {
        let mut c = pay_check();
        let id = EntryId::from(1);
        assert_eq!(c.state(&id), Some(ItemState::Viewing));

        c.begin_edit(&id).unwrap();
        match c.state(&id) {
            Some(ItemState::Editing(buf)) => {
                assert_eq!(buf.label, "Pay Check");
                assert_eq!(buf.amount, "5000");
            }
            other => panic!("expected editing, got {other:?}"),
        }
    }

    #[test]
    fn buffers_do_not_touch_entry_until_save() {
        let mut c = pay_check();
        let id = EntryId::from(1);
        c.begin_edit(&id).unwrap();
        c.set_label(&id, "Salary").unwrap();
        c.set_amount(&id, "6000").unwrap();
        assert_eq!(c.get(&id).unwrap().label, "Pay Check");

        let previous = c.save(&id).unwrap();
        assert_eq!(previous.amount, 5000.0);
        let entry = c.get(&id).unwrap();
        assert_eq!(entry.label, "Salary");
        assert_eq!(entry.amount, 6000.0);
        assert_eq!(c.state(&id), Some(ItemState::Viewing));
    }

    #[test]
    fn save_coerces_bad_amount_to_zero() {
        let mut c = pay_check();
        let id = EntryId::from(1);
        c.begin_edit(&id).unwrap();
        c.set_amount(&id, "five thousand").unwrap();
        c.save(&id).unwrap();
        assert_eq!(c.get(&id).unwrap().amount, 0.0);
    }

    #[test]
    fn save_updates_only_the_matching_entry() {
        let mut c = pay_check();
        let other = c.add().entry;
        c.begin_edit(&other).unwrap();
        c.set_label(&other, "Dividends").unwrap();
        c.save(&other).unwrap();

        assert_eq!(c.get(&EntryId::from(1)).unwrap().label, "Pay Check");
        assert_eq!(c.get(&other).unwrap().label, "Dividends");
    }

    #[test]
    fn cancel_discards_buffers() {
        let mut c = pay_check();
        let id = EntryId::from(1);
        c.begin_edit(&id).unwrap();
        c.set_label(&id, "Nope").unwrap();
        c.cancel(&id).unwrap();
        assert_eq!(c.get(&id).unwrap().label, "Pay Check");
        assert_eq!(c.state(&id), Some(ItemState::Viewing));
    }

    #[test]
    fn transitions_require_editing_state() {
        let mut c = pay_check();
        let id = EntryId::from(1);
        assert!(matches!(c.save(&id), Err(CoreError::InvalidState(_))));
        assert!(matches!(c.cancel(&id), Err(CoreError::InvalidState(_))));
        assert!(matches!(c.set_label(&id, "x"), Err(CoreError::InvalidState(_))));
        assert!(matches!(
            c.begin_edit(&EntryId::from(2)),
            Err(CoreError::RecordNotFound(_))
        ));
    }

    #[test]
    fn delete_while_editing_drops_buffers() {
        let mut c = pay_check();
        let id = EntryId::from(1);
        c.begin_edit(&id).unwrap();
        c.delete(&id).unwrap();
        assert_eq!(c.state(&id), None);
    }

    #[test]
    fn add_delete_edit_scenario() {
        let mut c = pay_check();
        let new_id = c.add().entry;
        c.delete(&EntryId::from(1)).unwrap();

        c.begin_edit(&new_id).unwrap();
        c.set_label(&new_id, "Freelance").unwrap();
        c.set_amount(&new_id, "2500").unwrap();
        c.save(&new_id).unwrap();

        assert_eq!(c.len(), 1);
        let entry = &c.entries()[0];
        assert_eq!(entry.label, "Freelance");
        assert_eq!(entry.amount, 2500.0);
    }

    #[test]
    fn rekey_carries_open_edit() {
        let mut c = EditableCollection::new();
        let pending = c.add().entry;
        c.begin_edit(&pending).unwrap();
        c.rekey(&pending, EntryId::from(8)).unwrap();

        assert!(c.get(&pending).is_none());
        assert!(matches!(c.state(&EntryId::from(8)), Some(ItemState::Editing(_))));
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Aggregates
// ═══════════════════════════════════════════════════════════════════

mod aggregates {
    use super::*;

    #[test]
    fn total_sums_every_amount() {
        let c = EditableCollection::from_entries(vec![
            CollectionEntry::new(1, "Pay Check", 5000.0, "#1"),
            CollectionEntry::new(2, "Freelance", 2500.0, "#2"),
            CollectionEntry::new(3, "Nothing yet", 0.0, "#3"),
        ]);
        assert_eq!(c.total(), 7500.0);
    }

    #[test]
    fn chart_skips_zero_amounts() {
        let mut c = pay_check();
        c.add();
        let slices = c.chart_slices();
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].name, "Pay Check");
        assert_eq!(slices[0].color, "#3B82F6");
        assert_eq!(slices[0].share_percent(c.total()), 100.0);
    }

    #[test]
    fn empty_collection() {
        let c = EditableCollection::new();
        assert!(c.is_empty());
        assert_eq!(c.total(), 0.0);
        assert!(c.chart_slices().is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
//  IncomeBoard: optimistic update, then persist
// ═══════════════════════════════════════════════════════════════════

mod board {
    use super::*;

    #[tokio::test]
    async fn load_fills_missing_colors_from_palette() {
        let gw = Arc::new(MockGateway::replying(vec![Reply::Ok(json!([
            {"id": 1, "type": "Pay Check", "amount": "5000.00", "color": "#FF0000"},
            {"id": 2, "name": "Rental", "amount": 800},
            {"id": 3, "amount": 10}
        ]))]));
        let (mut board, palette) = board_on(&gw);

        assert_eq!(board.load().await.unwrap(), 3);
        let entries = board.collection().entries();
        assert_eq!(entries[0].color, "#FF0000");
        assert_eq!(entries[1].color, INCOME_PALETTE[0]);
        assert_eq!(entries[1].label, "Rental");
        assert_eq!(entries[2].label, "Unnamed Income");
        assert_eq!(entries[2].color, INCOME_PALETTE[1]);
        assert_eq!(board.total(), 5810.0);

        // reloading keeps the same colors
        gw.push(Reply::Ok(json!([{"id": 2, "amount": 800}])));
        board.load().await.unwrap();
        assert_eq!(board.collection().entries()[0].color, INCOME_PALETTE[0]);
        assert_eq!(palette.assigned_count(EntryDomain::Income).unwrap(), 2);
    }

    #[tokio::test]
    async fn saving_pending_entry_creates_and_rekeys() {
        let gw = Arc::new(MockGateway::replying(vec![Reply::Ok(json!({"id": 44}))]));
        let (mut board, _) = board_on(&gw);

        let pending = board.add().entry;
        let c = board.collection_mut();
        c.begin_edit(&pending).unwrap();
        c.set_label(&pending, "Freelance").unwrap();
        c.set_amount(&pending, "2500").unwrap();

        let id = board.save(&pending).await.unwrap();
        assert_eq!(id, EntryId::Persisted(RecordId::Number(44)));
        assert!(board.collection().get(&pending).is_none());
        assert_eq!(board.collection().get(&id).unwrap().amount, 2500.0);

        let call = gw.last_call();
        assert_eq!(call.method, "POST");
        assert_eq!(call.path, "/income/");
        let body = call.body.unwrap();
        assert_eq!(body["type"], json!("Freelance"));
        assert_eq!(body["amount"], json!(2500.0));
        assert!(body["color"].as_str().unwrap().starts_with("hsl("));
    }

    #[tokio::test]
    async fn create_without_id_stays_pending() {
        let gw = Arc::new(MockGateway::new());
        let (mut board, _) = board_on(&gw);
        let pending = board.add().entry;
        board.collection_mut().begin_edit(&pending).unwrap();

        let id = board.save(&pending).await.unwrap();
        assert_eq!(id, pending);
    }

    #[tokio::test]
    async fn saving_persisted_entry_updates() {
        let gw = Arc::new(MockGateway::new());
        let (mut board, _) = board_on(&gw);
        board.collection_mut().replace_all(vec![CollectionEntry::new(1, "Pay Check", 5000.0, "#3B82F6")]);

        let id = EntryId::from(1);
        board.collection_mut().begin_edit(&id).unwrap();
        board.collection_mut().set_amount(&id, "5200").unwrap();
        assert_eq!(board.save(&id).await.unwrap(), id);

        let call = gw.last_call();
        assert_eq!(call.method, "PUT");
        assert_eq!(call.path, "/income/1/");
        let body = call.body.unwrap();
        assert_eq!(body["amount"], json!(5200.0));
        assert_eq!(body["id"], json!("1"));
        assert_eq!(body["color"], json!("#3B82F6"));
    }

    #[tokio::test]
    async fn relabel_regenerates_synthesized_description() {
        let gw = Arc::new(MockGateway::replying(vec![Reply::Ok(json!([
            {"id": 1, "type": "Pay Check", "amount": 5000, "color": "#3B82F6",
             "description": "Income from Pay Check"},
            {"id": 2, "type": "Rental", "amount": 800, "color": "#8B5CF6",
             "description": "Flat on Main St"}
        ]))]));
        let (mut board, _) = board_on(&gw);
        board.load().await.unwrap();

        let id = EntryId::from(1);
        board.collection_mut().begin_edit(&id).unwrap();
        board.collection_mut().set_label(&id, "Freelance").unwrap();
        board.save(&id).await.unwrap();

        let body = gw.last_call().body.unwrap();
        assert_eq!(body["type"], json!("Freelance"));
        assert_eq!(body["description"], json!("Income from Freelance"));
        assert_eq!(
            board.collection().get(&id).unwrap().description.as_deref(),
            Some("Income from Freelance")
        );

        let custom = EntryId::from(2);
        board.collection_mut().begin_edit(&custom).unwrap();
        board.collection_mut().set_label(&custom, "Lodger").unwrap();
        board.save(&custom).await.unwrap();
        assert_eq!(gw.last_call().body.unwrap()["description"], json!("Flat on Main St"));
    }

    #[tokio::test]
    async fn failed_relabel_restores_old_description() {
        let gw = Arc::new(MockGateway::replying(vec![Reply::Fail(500, "boom")]));
        let (mut board, _) = board_on(&gw);
        let mut entry = CollectionEntry::new(1, "Pay Check", 5000.0, "#3B82F6");
        entry.description = Some("Income from Pay Check".into());
        board.collection_mut().replace_all(vec![entry.clone()]);

        let id = EntryId::from(1);
        board.collection_mut().begin_edit(&id).unwrap();
        board.collection_mut().set_label(&id, "Freelance").unwrap();
        assert!(board.save(&id).await.is_err());
        assert_eq!(board.collection().get(&id), Some(&entry));
    }

    #[tokio::test]
    async fn failed_save_rolls_back() {
        let gw = Arc::new(MockGateway::replying(vec![Reply::Fail(500, "boom")]));
        let (mut board, _) = board_on(&gw);
        board.collection_mut().replace_all(vec![CollectionEntry::new(1, "Pay Check", 5000.0, "#3B82F6")]);

        let id = EntryId::from(1);
        board.collection_mut().begin_edit(&id).unwrap();
        board.collection_mut().set_label(&id, "Salary").unwrap();

        let err = board.save(&id).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        let entry = board.collection().get(&id).unwrap();
        assert_eq!(entry.label, "Pay Check");
        assert_eq!(entry.amount, 5000.0);
    }

    #[tokio::test]
    async fn failed_delete_restores_position() {
        let gw = Arc::new(MockGateway::replying(vec![Reply::Network("offline")]));
        let (mut board, _) = board_on(&gw);
        board.collection_mut().replace_all(vec![
            CollectionEntry::new(1, "Pay Check", 5000.0, "#1"),
            CollectionEntry::new(2, "Freelance", 2500.0, "#2"),
        ]);

        assert!(board.delete(&EntryId::from(1)).await.is_err());
        let labels: Vec<&str> = board.collection().entries().iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, vec!["Pay Check", "Freelance"]);
    }

    #[tokio::test]
    async fn delete_persisted_hits_backend() {
        let gw = Arc::new(MockGateway::new());
        let (mut board, _) = board_on(&gw);
        board.collection_mut().replace_all(vec![CollectionEntry::new(1, "Pay Check", 5000.0, "#1")]);

        board.delete(&EntryId::from(1)).await.unwrap();
        assert!(board.collection().is_empty());
        assert_eq!(gw.last_call().path, "/income/1/");
    }

    #[tokio::test]
    async fn delete_pending_stays_local() {
        let gw = Arc::new(MockGateway::new());
        let (mut board, _) = board_on(&gw);
        let pending = board.add().entry;

        board.delete(&pending).await.unwrap();
        assert!(board.collection().is_empty());
        assert!(gw.calls().is_empty());
    }
}
