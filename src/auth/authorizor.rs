use oso::{Oso, PolarClass};

use crate::auth::User;
use crate::entities::AdminRecord;
use crate::error::Error;

pub fn new() -> Result<Oso, Error> {
    let mut o = Oso::new();

    o.register_class(User::get_polar_class())?;
    o.register_class(AdminRecord::get_polar_class())?;

    o.load_str(include_str!("rules.polar"))?;

    Ok(o)
}

#[test]
fn admin_set_member_test() {
    let authorizor = new().unwrap();

    let mut record = AdminRecord::default();
    record.grant("uid-1".into());

    let result = authorizor.is_allowed(User::new("uid-1"), "administer", record.clone());
    assert_eq!(result.unwrap(), true);

    let result = authorizor.is_allowed(User::new("uid-2"), "administer", record.clone());
    assert_eq!(result.unwrap(), false);
}

#[test]
fn admin_mode_test() {
    let authorizor = new().unwrap();

    let mut record = AdminRecord::default();

    let result = authorizor.is_allowed(User::new("anyone"), "administer", record.clone());
    assert_eq!(result.unwrap(), false);

    record.admin_mode = true;

    let result = authorizor.is_allowed(User::new("anyone"), "administer", record.clone());
    assert_eq!(result.unwrap(), true);
}

#[test]
fn unknown_action_test() {
    let authorizor = new().unwrap();

    let mut record = AdminRecord::default();
    record.grant("uid-1".into());
    record.admin_mode = true;

    let result = authorizor.is_allowed(User::new("uid-1"), "delete", record.clone());
    assert_eq!(result.unwrap(), false);
}
