use crisper_storefront::model::{reduce, CartCommand, CartState, MenuItem, MenuItemId};
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;

fn item(id: i64) -> MenuItem {
    MenuItem::new(id, format!("Item {id}"), 250.0 * id as f64 + 0.5)
}

/// Adds always carry at least one unit, so no zero lines can appear.
fn arb_command() -> impl Strategy<Value = CartCommand> {
    let id = 1i64..=4;
    prop_oneof![
        3 => (id.clone(), 1u32..=5, proptest::option::of("[a-z ]{0,8}")).prop_map(
            |(id, quantity, special_request)| CartCommand::AddItem {
                item: item(id),
                quantity,
                special_request,
            }
        ),
        1 => id.clone().prop_map(|id| CartCommand::RemoveItem(MenuItemId(id))),
        2 => (id.clone(), -3i64..=8).prop_map(|(id, quantity)| CartCommand::UpdateQuantity {
            item_id: MenuItemId(id),
            quantity,
        }),
        1 => (id, "[a-z]{0,6}").prop_map(|(id, special_request)| {
            CartCommand::UpdateSpecialRequest {
                item_id: MenuItemId(id),
                special_request,
            }
        }),
        1 => Just(CartCommand::Clear),
    ]
}

fn arb_commands() -> impl Strategy<Value = Vec<CartCommand>> {
    prop::collection::vec(arb_command(), 0..40)
}

/// Straightforward list of (id, quantity, note) that the reducer must agree with.
#[derive(Debug, Default)]
struct Model {
    lines: Vec<(i64, u32, Option<String>)>,
}

impl Model {
    fn apply(&mut self, command: &CartCommand) {
        match command {
            CartCommand::AddItem {
                item,
                quantity,
                special_request,
            } => match self.lines.iter_mut().find(|(id, _, _)| *id == item.id.0) {
                Some((_, q, note)) => {
                    *q = q.saturating_add(*quantity);
                    if special_request.is_some() {
                        *note = special_request.clone();
                    }
                }
                None => self
                    .lines
                    .push((item.id.0, *quantity, special_request.clone())),
            },
            CartCommand::RemoveItem(item_id) => self.lines.retain(|(id, _, _)| *id != item_id.0),
            CartCommand::UpdateQuantity { item_id, quantity } => {
                if *quantity <= 0 {
                    self.lines.retain(|(id, _, _)| *id != item_id.0);
                } else if let Some((_, q, _)) =
                    self.lines.iter_mut().find(|(id, _, _)| *id == item_id.0)
                {
                    *q = *quantity as u32;
                }
            }
            CartCommand::UpdateSpecialRequest {
                item_id,
                special_request,
            } => {
                if let Some((_, _, note)) = self.lines.iter_mut().find(|(id, _, _)| *id == item_id.0) {
                    *note = Some(special_request.clone());
                }
            }
            CartCommand::Clear => self.lines.clear(),
        }
    }
}

fn run(commands: &[CartCommand]) -> CartState {
    commands
        .iter()
        .cloned()
        .fold(CartState::new(), reduce)
}

fn assert_invariants(state: &CartState) -> Result<(), TestCaseError> {
    let mut ids: Vec<_> = state.lines().iter().map(|line| line.id()).collect();
    ids.sort_by_key(|id| id.0);
    ids.dedup();
    prop_assert_eq!(ids.len(), state.lines().len(), "duplicate lines");

    prop_assert!(state.lines().iter().all(|line| line.quantity > 0));

    let items: u64 = state.lines().iter().map(|l| u64::from(l.quantity)).sum();
    prop_assert_eq!(state.total_items(), items);

    let price: f64 = state.lines().iter().map(|l| l.item.price * f64::from(l.quantity)).sum();
    prop_assert!((state.total_price() - price).abs() < 1e-6);
    prop_assert!(state.total_price() >= 0.0);
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig {
        // Do not write `.proptest-regressions` files into the repo.
        failure_persistence: None,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_every_reachable_state_is_consistent(commands in arb_commands()) {
        let mut state = CartState::new();
        for command in commands {
            state = reduce(state, command);
            assert_invariants(&state)?;
        }
    }

    #[test]
    fn prop_reducer_matches_model(commands in arb_commands()) {
        let mut model = Model::default();
        for command in &commands {
            model.apply(command);
        }
        let state = run(&commands);

        let actual: Vec<_> = state
            .lines()
            .iter()
            .map(|line| (line.id().0, line.quantity, line.special_request.clone()))
            .collect();
        prop_assert_eq!(actual, model.lines);
    }

    #[test]
    fn prop_remove_is_idempotent(commands in arb_commands(), id in 1i64..=4) {
        let once = reduce(run(&commands), CartCommand::RemoveItem(MenuItemId(id)));
        let twice = reduce(once.clone(), CartCommand::RemoveItem(MenuItemId(id)));
        prop_assert_eq!(once.item_quantity(MenuItemId(id)), 0);
        prop_assert_eq!(twice, once);
    }

    #[test]
    fn prop_clear_resets_fully(commands in arb_commands()) {
        let cleared = reduce(run(&commands), CartCommand::Clear);
        prop_assert_eq!(cleared, CartState::default());
    }

    #[test]
    fn prop_quantity_change_keeps_note(
        commands in arb_commands(),
        id in 1i64..=4,
        quantity in 1i64..=9,
    ) {
        let state = run(&commands);
        let before = state.line(MenuItemId(id)).map(|line| line.special_request.clone());
        let after = reduce(
            state,
            CartCommand::UpdateQuantity { item_id: MenuItemId(id), quantity },
        );
        let after_line = after.line(MenuItemId(id));

        prop_assert_eq!(after_line.map(|line| line.special_request.clone()), before);
        if let Some(line) = after_line {
            prop_assert_eq!(i64::from(line.quantity), quantity);
        }
    }
}
