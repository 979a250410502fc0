use crate::features::world::{parse_answer, MedgateWorld};
use cucumber::{then, when};
use medgate_core::permissions::{self, Module, ModuleAction, SidebarMenu};

#[when(expr = "I check whether {string} may {string} on {string}")]
async fn check_action(world: &mut MedgateWorld, role: String, action: String, module: String) {
    let module: Module = module.parse().expect("declared module");
    let action: ModuleAction = action.parse().expect("declared action");
    world.last_answer = Some(permissions::can_perform_action(&role, module, action));
}

#[when(expr = "I check whether {string} has access to module {string}")]
async fn check_module(world: &mut MedgateWorld, role: String, module: String) {
    let module: Module = module.parse().expect("declared module");
    world.last_answer = Some(permissions::has_module_access(&role, module));
}

#[when(expr = "I check whether {string} may see menu {string}")]
async fn check_menu(world: &mut MedgateWorld, role: String, menu: String) {
    let menu: SidebarMenu = menu.parse().expect("declared menu");
    world.last_answer = Some(permissions::can_access_sidebar_menu(&role, menu));
}

#[when(expr = "I check whether {string} may open {string}")]
async fn check_route(world: &mut MedgateWorld, role: String, path: String) {
    world.last_answer = Some(permissions::can_access_route(&role, &path));
}

#[then(expr = "the answer is {word}")]
async fn answer_is(world: &mut MedgateWorld, answer: String) {
    assert_eq!(world.last_answer, Some(parse_answer(&answer)));
}

#[then(expr = "{string} has exactly these actions on {string}: {string}")]
async fn exact_actions(_world: &mut MedgateWorld, role: String, module: String, actions: String) {
    let module: Module = module.parse().expect("declared module");
    let actual: Vec<&str> =
        permissions::allowed_actions(&role, module).iter().map(|a| a.as_str()).collect();
    let expected: Vec<&str> =
        actions.split(',').map(str::trim).filter(|a| !a.is_empty()).collect();
    assert_eq!(actual, expected);
}
