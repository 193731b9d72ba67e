use crate::user::User;

const USERS: [(i64, &str, &str, &str, &str); 8] = [
    (1, "Sarah Johnson", "sarah.johnson@company.com", "Project Manager", "SJ"),
    (2, "Mike Chen", "mike.chen@company.com", "Developer", "MC"),
    (3, "Emily Davis", "emily.davis@company.com", "Designer", "ED"),
    (4, "Alex Rodriguez", "alex.rodriguez@company.com", "Developer", "AR"),
    (5, "Lisa Thompson", "lisa.thompson@company.com", "QA Engineer", "LT"),
    (6, "David Kim", "david.kim@company.com", "DevOps", "DK"),
    (7, "Rachel Green", "rachel.green@company.com", "Business Analyst", "RG"),
    (8, "Tom Wilson", "tom.wilson@company.com", "Team Lead", "TW"),
];

/// Read-only teammate directory used for task assignment.
#[derive(Debug, Clone)]
pub struct UserDirectory {
    users: Vec<User>,
}

impl UserDirectory {
    pub fn new() -> Self {
        let users = USERS
            .iter()
            .map(|&(id, name, email, role, avatar)| User {
                id,
                name: name.to_string(),
                email: email.to_string(),
                role: role.to_string(),
                avatar: avatar.to_string(),
            })
            .collect();
        UserDirectory { users }
    }

    pub fn get_all(&self) -> Vec<User> {
        self.users.clone()
    }

    pub fn get_by_id(&self, id: i64) -> Option<User> {
        self.users.iter().find(|u| u.id == id).cloned()
    }
}

impl Default for UserDirectory {
    fn default() -> Self {
        UserDirectory::new()
    }
}
