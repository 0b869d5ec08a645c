use crate::record::{Column, Value};

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub age: i64,
    pub email: String,
}

impl User {
    fn new(id: i64, name: &str, age: i64, email: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            age,
            email: email.to_string(),
        }
    }
}

pub fn user_columns() -> Vec<Column<User>> {
    vec![
        Column::new("id", "ID", |u: &User| Some(Value::Number(u.id))),
        Column::new("name", "Nome", |u: &User| Some(Value::from(u.name.as_str()))),
        Column::new("age", "Idade", |u: &User| Some(Value::Number(u.age))).unsortable(),
        Column::new("email", "Email", |u: &User| Some(Value::from(u.email.as_str()))),
    ]
}

pub fn sample_users() -> Vec<User> {
    vec![
        User::new(1, "João", 30, "joao@example.com"),
        User::new(2, "Maria", 25, "maria@example.com"),
        User::new(3, "Pedro", 35, "pedro@example.com"),
        User::new(4, "Ana", 28, "ana@example.com"),
        User::new(5, "Lucas", 22, "lucas@example.com"),
        User::new(6, "Carla", 27, "carla@example.com"),
    ]
}
