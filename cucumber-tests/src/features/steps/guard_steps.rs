use crate::features::world::{parse_permission, GuardedEndpoint, MedgateWorld};
use cucumber::gherkin::Step;
use cucumber::{given, then, when};
use http::Method;
use medgate_core::rbac::{ResolutionPolicy, UserRecord};

#[given("a clinic with users:")]
async fn clinic_with_users(world: &mut MedgateWorld, step: &Step) {
    let table = step.table.as_ref().expect("users table");
    for row in table.rows.iter().skip(1) {
        world.directory.insert(UserRecord::new(row[0].clone(), row[1].clone())).await;
    }
}

#[given(expr = "an endpoint {word} {string} guarded by {string}")]
async fn guarded_endpoint(world: &mut MedgateWorld, method: String, pattern: String, permission: String) {
    let (module, action) = parse_permission(&permission);
    world.endpoints.push(GuardedEndpoint {
        method: method.parse().expect("HTTP method"),
        pattern,
        module,
        action,
    });
}

#[given("the user directory is unavailable")]
async fn directory_down(world: &mut MedgateWorld) {
    world.directory_down = true;
}

#[given(expr = "role resolution falls back to {string}")]
async fn fallback_policy(world: &mut MedgateWorld, role: String) {
    world.policy = ResolutionPolicy::Fallback(role.parse().expect("declared role"));
}

#[given(expr = "{string} is reassigned to {string}")]
async fn reassign(world: &mut MedgateWorld, id: String, role: String) {
    assert!(world.directory.assign_role(&id, role).await, "unknown user {}", id);
}

#[given(expr = "{string} has {string} revoked")]
async fn revoke_for(world: &mut MedgateWorld, id: String, permission: String) {
    let (module, action) = parse_permission(&permission);
    let user = world.directory.remove(&id).await.expect("known user");
    let overrides = user.overrides.clone().revoke(module, action);
    world.directory.insert(user.with_overrides(overrides)).await;
}

#[given(expr = "{string} is granted {string}")]
async fn grant_for(world: &mut MedgateWorld, id: String, permission: String) {
    let (module, action) = parse_permission(&permission);
    let user = world.directory.remove(&id).await.expect("known user");
    let overrides = user.overrides.clone().grant(module, action);
    world.directory.insert(user.with_overrides(overrides)).await;
}

#[when(expr = "{string} sends {word} {string}")]
async fn send_as(world: &mut MedgateWorld, subject: String, method: String, path: String) {
    let method: Method = method.parse().expect("HTTP method");
    world.send(method, &path, Some(&subject)).await;
}

#[when(expr = "an anonymous caller sends {word} {string}")]
async fn send_anonymous(world: &mut MedgateWorld, method: String, path: String) {
    let method: Method = method.parse().expect("HTTP method");
    world.send(method, &path, None).await;
}

#[then(expr = "the response status is {int}")]
async fn status_is(world: &mut MedgateWorld, status: u16) {
    assert_eq!(world.last_status.map(|s| s.as_u16()), Some(status), "body: {}", world.last_body);
}

#[then(expr = "the response error is {string}")]
async fn error_is(world: &mut MedgateWorld, error: String) {
    assert_eq!(world.last_body["error"], error);
}

#[then(expr = "the response field {string} is {string}")]
async fn field_is(world: &mut MedgateWorld, field: String, value: String) {
    assert_eq!(world.last_body[field.as_str()], value.as_str());
}

#[then(expr = "the response does not mention {string}")]
async fn body_omits(world: &mut MedgateWorld, text: String) {
    assert!(!world.last_body.to_string().contains(&text), "body: {}", world.last_body);
}

#[then(expr = "the handler ran {int} time(s)")]
async fn handler_ran(world: &mut MedgateWorld, times: usize) {
    assert_eq!(world.hits(), times);
}
