//! Notification display formatting

use crate::models::NotificationItem;

/// Format the notification inbox, unread items marked with a dot
pub fn format_notification_list(items: &[NotificationItem]) -> String {
    if items.is_empty() {
        return "No hay notificaciones.\n".to_string();
    }

    let unread = items.iter().filter(|n| !n.read).count();
    let mut output = format!("Notificaciones ({} sin leer)\n", unread);

    for item in items {
        output.push_str(&format!(
            "{} {} {} [{}] {}\n    {}\n",
            if item.read { " " } else { "●" },
            item.id,
            item.timestamp.format("%Y-%m-%d %H:%M"),
            item.category,
            item.title,
            item.message
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NotificationCategory;
    use chrono::Utc;

    #[test]
    fn test_unread_marker() {
        let unread = NotificationItem::new("Hola", "uno", NotificationCategory::General, Utc::now());
        let mut read = NotificationItem::new("Adiós", "dos", NotificationCategory::Security, Utc::now());
        read.read = true;

        let output = format_notification_list(&[unread, read]);
        assert!(output.starts_with("Notificaciones (1 sin leer)"));
        assert!(output.contains("● "));
        assert!(output.contains("[Seguridad] Adiós"));
    }
}
