//! Account commands.

use paymall_client::SessionStore;

/// Print the signed-in user.
pub async fn whoami(session: &SessionStore) -> Result<(), Box<dyn std::error::Error>> {
    let user = session.current_user().await.ok_or("not signed in")?;
    println!("{} <{}>", user.display_name(), user.email);
    if let Some(phone) = &user.phone_number {
        println!("phone: {phone}");
    }
    Ok(())
}
