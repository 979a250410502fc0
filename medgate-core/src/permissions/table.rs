//! The Role-Permission Table
//!
//! Single source of truth for what each role may see and do. The table is
//! plain `static` data: it is built by the compiler, shared by the server
//! guards and the client gate, and cannot be reassigned at runtime.

use super::types::{Module, ModuleAction, Role, SidebarMenu};
use serde::Serialize;

/// Grant of a set of actions within one module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Permission {
    pub module: Module,
    pub actions: &'static [ModuleAction],
}

impl Permission {
    pub const fn new(module: Module, actions: &'static [ModuleAction]) -> Self {
        Self { module, actions }
    }

    /// Check if this grant contains `action`
    pub fn allows(&self, action: ModuleAction) -> bool {
        self.actions.contains(&action)
    }
}

/// Full permission bundle for one role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleConfig {
    pub name: &'static str,
    pub description: &'static str,
    /// Allowed navigation sections, in display order
    pub sidebar_menus: &'static [SidebarMenu],
    /// One entry per module the role touches; unlisted modules mean no access
    pub permissions: &'static [Permission],
}

impl RoleConfig {
    /// Grant entry for `module`, if the role touches it at all
    pub fn permission_for(&self, module: Module) -> Option<&'static Permission> {
        self.permissions.iter().find(|p| p.module == module)
    }

    /// Modules this role has an entry for, in table order
    pub fn modules(&self) -> impl Iterator<Item = Module> + '_ {
        self.permissions.iter().map(|p| p.module)
    }
}

use ModuleAction::*;

const ALL_ACTIONS: &[ModuleAction] = &[View, Add, Edit, Delete, Export, Import, Print, UploadFiles];

const SUPER_ADMIN: RoleConfig = RoleConfig {
    name: "Super Admin",
    description: "Full access to all clinic modules, user management and system settings",
    sidebar_menus: SidebarMenu::ALL,
    permissions: &[
        Permission::new(Module::Patients, ALL_ACTIONS),
        Permission::new(Module::Users, &[View, Add, Edit, Delete, Export]),
        Permission::new(Module::Analytics, &[View, Export, Print]),
        Permission::new(Module::Reports, ALL_ACTIONS),
        Permission::new(Module::Settings, &[View, Edit]),
        Permission::new(Module::Notifications, &[View, Add, Edit, Delete]),
    ],
};

const DOCTOR: RoleConfig = RoleConfig {
    name: "Doctor",
    description: "Manages patient records, reports and analytics",
    sidebar_menus: &[
        SidebarMenu::Dashboard,
        SidebarMenu::Patients,
        SidebarMenu::AddPatient,
        SidebarMenu::Files,
        SidebarMenu::DicomViewer,
        SidebarMenu::Analytics,
        SidebarMenu::Notifications,
    ],
    permissions: &[
        Permission::new(Module::Patients, &[View, Add, Edit, Delete, Export, Print, UploadFiles]),
        Permission::new(Module::Analytics, &[View, Export, Print]),
        Permission::new(Module::Reports, &[View, Add, Edit, Export, Print, UploadFiles]),
        Permission::new(Module::Notifications, &[View]),
    ],
};

const TECHNICIAN: RoleConfig = RoleConfig {
    name: "Technician",
    description: "Registers patients and uploads imaging files",
    sidebar_menus: &[
        SidebarMenu::Dashboard,
        SidebarMenu::Patients,
        SidebarMenu::AddPatient,
        SidebarMenu::Files,
        SidebarMenu::DicomViewer,
        SidebarMenu::Notifications,
    ],
    permissions: &[
        Permission::new(Module::Patients, &[View, Add, Edit, UploadFiles]),
        Permission::new(Module::Reports, &[View, UploadFiles]),
        Permission::new(Module::Notifications, &[View]),
    ],
};

/// Role → RoleConfig, in role declaration order
pub static ROLE_PERMISSIONS: &[(Role, RoleConfig)] = &[
    (Role::SuperAdmin, SUPER_ADMIN),
    (Role::Doctor, DOCTOR),
    (Role::Technician, TECHNICIAN),
];

/// Raw table lookup
pub fn lookup(role: Role) -> Option<&'static RoleConfig> {
    ROLE_PERMISSIONS.iter().find(|(r, _)| *r == role).map(|(_, config)| config)
}
