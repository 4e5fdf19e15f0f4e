use crate::domain::task::{Priority, Task, TaskStatus};

/// Demo tasks for a fresh install, so the first launch shows a live scene
/// instead of an empty arena.
pub fn seed_tasks() -> Vec<Task> {
    let mut configurar = Task::new(
        "Configurar Supabase".to_string(),
        "Crear tabla, políticas RLS y conectar con el cliente".to_string(),
    );
    configurar.status = TaskStatus::InProgress;
    configurar.priority = Priority::High;
    configurar.category = Some("MCPs/Automatización".to_string());
    configurar.add_tag("mcp".to_string());
    configurar.add_tag("supabase".to_string());
    configurar.add_tag("database".to_string());
    configurar.set_position(400.0, 300.0);

    let mut migracion = Task::new(
        "Probar Migración".to_string(),
        "Verificar que las tareas locales se suben a la nube".to_string(),
    );
    migracion.priority = Priority::Critical;
    migracion.category = Some("MCPs/Automatización".to_string());
    migracion.add_tag("testing".to_string());
    migracion.set_position(200.0, 200.0);

    let mut tesis = Task::new(
        "Escribir Tesis".to_string(),
        "Avanzar con el capítulo de metodología".to_string(),
    );
    tesis.priority = Priority::Medium;
    tesis.category = Some("Tesis".to_string());
    tesis.add_tag("academic".to_string());
    tesis.set_position(600.0, 400.0);

    vec![configurar, migracion, tesis]
}
