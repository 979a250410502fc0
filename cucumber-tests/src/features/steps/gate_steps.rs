use crate::features::world::{parse_permission, MedgateWorld};
use cucumber::{given, then, when};
use medgate_core::gate::{protect, GateState, PermissionContext, PermissionGate, ScreenOutcome};
use medgate_core::permissions::{find_route, Module, SidebarMenu};

#[given(expr = "the current user has role {string}")]
async fn resolved_user(world: &mut MedgateWorld, role: String) {
    world.context = PermissionContext::resolved(role);
}

#[given("the current user is anonymous")]
async fn anonymous_user(world: &mut MedgateWorld) {
    world.context = PermissionContext::anonymous();
}

#[given("the current user's role is still loading")]
async fn loading_user(world: &mut MedgateWorld) {
    world.context = PermissionContext::loading();
}

#[given("a gate with no requirements")]
async fn empty_gate(world: &mut MedgateWorld) {
    world.gate = PermissionGate::new();
}

#[given(expr = "a gate requiring role {string}")]
async fn role_gate(world: &mut MedgateWorld, role: String) {
    world.gate = PermissionGate::new().roles([role.parse().expect("declared role")]);
}

#[given(expr = "a gate requiring menu {string}")]
async fn menu_gate(world: &mut MedgateWorld, menu: String) {
    let menu: SidebarMenu = menu.parse().expect("declared menu");
    world.gate = PermissionGate::new().menu(menu);
}

#[given(expr = "the gate also requires {string}")]
async fn add_permission(world: &mut MedgateWorld, permission: String) {
    let (module, action) = parse_permission(&permission);
    world.gate = world.gate.clone().permission(module, action);
}

#[given(expr = "the gate also requires module {string}")]
async fn add_module(world: &mut MedgateWorld, module: String) {
    let module: Module = module.parse().expect("declared module");
    world.gate = world.gate.clone().module(module);
}

#[when("the gate matches any requirement")]
async fn match_any(world: &mut MedgateWorld) {
    world.gate = world.gate.clone().match_any();
}

#[then(expr = "the gate state is {word}")]
async fn gate_state(world: &mut MedgateWorld, state: String) {
    let expected = match state.as_str() {
        "Loading" => GateState::Loading,
        "Granted" => GateState::Granted,
        "Denied" => GateState::Denied,
        other => panic!("unknown gate state {}", other),
    };
    assert_eq!(world.gate.evaluate(&world.context), expected);
}

#[when(expr = "the {string} screen is rendered")]
async fn render_screen(world: &mut MedgateWorld, path: String) {
    let route = find_route(&path).expect("protected route");
    let screen = protect(
        move |_: &PermissionContext| format!("content of {}", route.path),
        PermissionGate::for_route(route),
    );
    world.screen = Some(screen.render(&world.context));
}

#[then(expr = "the screen shows {string}")]
async fn screen_shows(world: &mut MedgateWorld, expected: String) {
    let shown = match world.screen.take().expect("a rendered screen") {
        ScreenOutcome::Loading => "a loading placeholder".to_string(),
        ScreenOutcome::AccessDenied => "access denied".to_string(),
        ScreenOutcome::Rendered(content) => content,
    };
    assert_eq!(shown, expected);
}
