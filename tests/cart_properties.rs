//! Cart engine behaviour across sequences of actions

use rusty_money::{
    Money,
    iso::{Currency, GBP},
};
use storefront_cart::prelude::*;
use testresult::TestResult;

fn price(minor: i64) -> Money<'static, Currency> {
    Money::from_minor(minor, GBP)
}

fn variant(id: &str, minor: i64) -> ProductVariant {
    ProductVariant::new(id, id, price(minor))
}

fn expected_total(state: &CartState) -> i64 {
    state
        .iter()
        .map(|line| line.price().to_minor_units() * i64::from(line.quantity().get()))
        .sum()
}

#[test]
fn same_key_adds_sum_into_one_line() -> TestResult {
    let quantities = [1, 4, 2, 7, 1];
    let mut cart = Cart::new(price(0));

    for quantity in quantities {
        cart.add(variant("p1", 300).with_size("M").with_quantity(quantity))?;
    }

    let key = cart.key_for("p1", Some("M"), None)?;

    assert_eq!(cart.state().len(), 1);
    assert_eq!(cart.state().quantity_of(&key), quantities.iter().sum::<u32>());

    Ok(())
}

#[test]
fn totals_match_lines_after_every_transition() -> TestResult {
    let mut cart = Cart::new(price(399));

    let p1 = cart.key_for("p1", None, None)?;
    let p2_red = cart.key_for("p2", Some("S"), Some("red"))?;

    let actions = [
        CartAction::Add(variant("p1", 1999).with_quantity(2)),
        CartAction::Add(variant("p2", 550).with_size("S").with_color("#ff0000")),
        CartAction::Increment(p2_red.clone()),
        CartAction::Add(variant("p3", 0)),
        CartAction::Decrement(p1.clone()),
        CartAction::Remove(p2_red),
        CartAction::Add(variant("p1", 1999).with_quantity(5)),
        CartAction::Decrement(p1),
    ];

    for action in actions {
        cart.apply(action)?;

        let state = cart.state();
        let recomputed = compute_totals(state.lines(), state.delivery_fee())?;

        assert_eq!(state.total().to_minor_units(), expected_total(state));
        assert_eq!(recomputed.total(), state.total());
        assert_eq!(
            state.grand_total().to_minor_units(),
            expected_total(state) + 399
        );
    }

    Ok(())
}

#[test]
fn decrement_until_removed_then_not_found() -> TestResult {
    let mut cart = Cart::new(price(0));
    cart.add(variant("p1", 100).with_quantity(3))?;
    let key = cart.key_for("p1", None, None)?;

    for _ in 0..3 {
        cart.decrement_one(key.clone())?;
    }

    assert!(cart.state().line(&key).is_none());
    assert_eq!(
        cart.decrement_one(key.clone()),
        Err(CartError::NotFound(key))
    );

    Ok(())
}

#[test]
fn remove_absent_key_is_a_no_op() -> TestResult {
    let mut cart = Cart::new(price(0));
    cart.add(variant("p1", 100))?;
    let before = cart.state().clone();

    let absent = cart.key_for("p9", None, None)?;
    let outcome = cart.remove(absent)?;

    assert!(matches!(outcome, CartOutcome::Removed { existed: false, .. }));
    assert_eq!(cart.state(), &before);

    Ok(())
}

#[test]
fn clear_leaves_only_delivery_fee() -> TestResult {
    let mut cart = Cart::new(price(650));
    cart.add(variant("p1", 100).with_quantity(9))?;
    cart.add(variant("p2", 700).with_color("Oat"))?;

    cart.clear()?;

    assert!(cart.state().lines().is_empty());
    assert_eq!(cart.state().total(), price(0));
    assert_eq!(cart.state().grand_total(), cart.state().delivery_fee());

    Ok(())
}

#[test]
fn snapshot_round_trip_preserves_totals() -> TestResult {
    let mut cart = Cart::new(price(250));
    cart.add(variant("p1", 5000).with_quantity(2))?;
    cart.add(variant("p1", 5000).with_size("M").with_color("#000080"))?;
    cart.add(variant("p2", 1234).with_color("Forest Green"))?;

    let json = CartSnapshot::from_state(cart.state()).to_json()?;
    let restored = CartSnapshot::from_json(&json)?.restore(cart.palette().clone())?;

    assert_eq!(restored.state().total(), cart.state().total());
    assert_eq!(restored.state().grand_total(), cart.state().grand_total());
    assert_eq!(restored.state(), cart.state());

    Ok(())
}

#[test]
fn scenario_sizes_split_lines() -> TestResult {
    let mut cart = Cart::new(price(0));

    cart.add(variant("p1", 5000).with_quantity(2))?;
    cart.add(variant("p1", 5000).with_quantity(1).with_size("M"))?;
    cart.add(variant("p1", 5000).with_quantity(1))?;

    let plain = cart.key_for("p1", None, None)?;
    let medium = cart.key_for("p1", Some("M"), None)?;

    assert_eq!(cart.state().len(), 2);
    assert_eq!(cart.state().quantity_of(&plain), 3);
    assert_eq!(cart.state().quantity_of(&medium), 1);
    assert_eq!(cart.state().total(), price(20_000));

    let keys: Vec<String> = cart.state().iter().map(|line| line.key().to_string()).collect();
    assert_eq!(keys, vec!["(p1, -, -)", "(p1, M, -)"]);

    Ok(())
}

#[test]
fn scenario_default_quantity_then_decrement_empties_cart() -> TestResult {
    let mut cart = Cart::new(price(0));

    cart.add(variant("p2", 1000))?;
    let key = cart.key_for("p2", None, None)?;
    cart.decrement_one(key)?;

    assert_eq!(cart.state().len(), 0);
    assert_eq!(cart.state().total(), price(0));

    Ok(())
}

#[test]
fn scenario_negative_price_is_rejected() -> TestResult {
    let mut cart = Cart::new(price(0));
    cart.add(variant("p1", 100))?;
    let before = cart.state().lines().to_vec();

    let result = cart.add(variant("p3", -100));

    assert!(matches!(
        result,
        Err(CartError::Validation(ValidationError::NegativePrice(-100)))
    ));
    assert_eq!(cart.state().lines(), before.as_slice());

    Ok(())
}

#[test]
fn empty_and_non_empty_macro_states() -> TestResult {
    let mut cart = Cart::new(price(0));
    assert!(cart.state().is_empty());

    cart.add(variant("p1", 100))?;
    assert!(!cart.state().is_empty());

    let key = cart.key_for("p1", None, None)?;
    cart.remove(key)?;
    assert!(cart.state().is_empty());

    cart.add(variant("p1", 100))?;
    assert!(!cart.state().is_empty());

    Ok(())
}
