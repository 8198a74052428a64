use lettre::smtp::ConnectionReuseParameters;
use lettre::ClientSecurity;
use lettre::{
    smtp::authentication::{Credentials, Mechanism},
    ClientTlsParameters,
};
use lettre::{SmtpClient, Transport};
use lettre_email::Email;
use native_tls::{Protocol, TlsConnector};

use crate::api::models::error::APIError;
use crate::db::models::user_profile::UserProfile;
use crate::CONFIG;

fn salutation(profile: &UserProfile) -> String {
    let full_name = profile.full_name();
    if full_name.is_empty() {
        "Hello".to_owned()
    } else {
        format!("Hello {}", full_name)
    }
}

pub fn notify_credentials_assigned(
    profile: &UserProfile,
    account_number: &str,
    password: &str,
    server: &str,
) -> Result<(), APIError> {
    send_email(
        vec![profile.email.clone()],
        "Your trading account is ready".to_owned(),
        credentials_body(
            &salutation(profile),
            account_number,
            password,
            server,
            &CONFIG.server.frontend_url,
        ),
    )
}

pub fn notify_challenge_breached(profile: &UserProfile, reason: &str) -> Result<(), APIError> {
    send_email(
        vec![profile.email.clone()],
        "Your challenge has been breached".to_owned(),
        breach_body(&salutation(profile), reason, &CONFIG.server.frontend_url),
    )
}

pub fn notify_challenge_purchased(
    profile: &UserProfile,
    challenge_name: &str,
    account_size: &str,
    amount_paid: &str,
) -> Result<(), APIError> {
    send_email(
        vec![profile.email.clone()],
        format!("Your {} purchase", challenge_name),
        purchase_body(
            &salutation(profile),
            challenge_name,
            account_size,
            amount_paid,
        ),
    )
}

pub fn notify_phase_completed(
    profile: &UserProfile,
    phase: i32,
    funded: bool,
) -> Result<(), APIError> {
    let subject = if funded {
        "Congratulations, you are funded".to_owned()
    } else {
        format!("Phase {} completed", phase)
    };
    send_email(
        vec![profile.email.clone()],
        subject,
        phase_body(&salutation(profile), phase, funded),
    )
}

pub fn notify_payout_requested(profile: &UserProfile, amount: &str) -> Result<(), APIError> {
    send_email(
        vec![profile.email.clone()],
        "Payout request received".to_owned(),
        payout_body(&salutation(profile), amount),
    )
}

fn credentials_body(
    salutation: &str,
    account_number: &str,
    password: &str,
    server: &str,
    frontend_url: &str,
) -> String {
    format!(
        "{},\n\n\
        Your trading account has been provisioned. Log in to MetaTrader 5 with:\n\n\
        Account: {}\n\
        Password: {}\n\
        Server: {}\n\n\
        Track your progress at {}.\n\n\
        Good trading,\nThe Fund8r team",
        salutation, account_number, password, server, frontend_url
    )
}

fn breach_body(salutation: &str, reason: &str, frontend_url: &str) -> String {
    format!(
        "{},\n\n\
        Unfortunately your challenge has been marked as breached.\n\n\
        Reason: {}\n\n\
        You can review the details at {} or start a new challenge at any time.\n\n\
        The Fund8r team",
        salutation, reason, frontend_url
    )
}

fn purchase_body(
    salutation: &str,
    challenge_name: &str,
    account_size: &str,
    amount_paid: &str,
) -> String {
    format!(
        "{},\n\n\
        Thank you for purchasing the {} with an account size of ${}.\n\
        Amount paid: ${}.\n\n\
        Your trading credentials will follow in a separate email once your\n\
        account has been provisioned.\n\n\
        The Fund8r team",
        salutation, challenge_name, account_size, amount_paid
    )
}

fn phase_body(salutation: &str, phase: i32, funded: bool) -> String {
    if funded {
        format!(
            "{},\n\n\
            You have passed the final evaluation phase and your account is now\n\
            funded. Our team will reach out with the next steps.\n\n\
            The Fund8r team",
            salutation
        )
    } else {
        format!(
            "{},\n\n\
            You have completed phase {} of your challenge. Keep it up, the next\n\
            phase starts right away.\n\n\
            The Fund8r team",
            salutation, phase
        )
    }
}

fn payout_body(salutation: &str, amount: &str) -> String {
    format!(
        "{},\n\n\
        We received your payout request over ${}. Payouts are processed within\n\
        three business days.\n\n\
        The Fund8r team",
        salutation, amount
    )
}

pub fn send_email(
    destinations: Vec<String>,
    subject: String,
    message: String,
) -> Result<(), APIError> {
    let mut email_builder = Email::builder();
    for destination in destinations {
        email_builder = email_builder.to(destination);
    }
    let email = email_builder
        .from(CONFIG.smtp.sender.as_ref())
        .subject(subject)
        .text(message)
        .build()?;

    let mut tls_builder = TlsConnector::builder();
    tls_builder.min_protocol_version(Some(Protocol::Tlsv10));
    let tls_parameters = ClientTlsParameters::new(CONFIG.smtp.host.clone(), tls_builder.build()?);

    let mut mailer = SmtpClient::new(
        (
            &CONFIG.smtp.host[..],
            u16::from_str_radix(&CONFIG.smtp.port, 10)?,
        ),
        ClientSecurity::Required(tls_parameters),
    )?
    .authentication_mechanism(Mechanism::Login)
    .credentials(Credentials::new(
        CONFIG.smtp.user.clone(),
        CONFIG.smtp.password.clone(),
    ))
    .connection_reuse(ConnectionReuseParameters::ReuseUnlimited)
    .transport();

    mailer.send(email.into())?;

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_credentials_body_contains_login_details() -> () {
        let body = credentials_body(
            "Hello Jane Trader",
            "10012345",
            "s3cret",
            "Fund8r-Demo",
            "https://app.fund8r.io",
        );

        assert_eq!(body.contains("Account: 10012345"), true);
        assert_eq!(body.contains("Password: s3cret"), true);
        assert_eq!(body.contains("Server: Fund8r-Demo"), true);
        assert_eq!(body.contains("https://app.fund8r.io"), true);
    }

    #[test]
    fn test_breach_body_names_the_reason() -> () {
        let body = breach_body(
            "Hello Jane Trader",
            "daily drawdown limit exceeded",
            "https://app.fund8r.io",
        );

        assert_eq!(body.contains("daily drawdown limit exceeded"), true);
    }

    #[test]
    fn test_send_email_surfaces_delivery_failures() -> () {
        // no SMTP server is listening on the configured host during tests,
        // the failure must reach the caller instead of vanishing
        let result = send_email(
            vec!["jane@example.com".to_owned()],
            "subject".to_owned(),
            "body".to_owned(),
        );

        match result {
            Err(APIError::EmailError { description: _ }) => (),
            other => panic!("expected an email error, got ok: {}", other.is_ok()),
        }
    }

    #[test]
    fn test_phase_body_distinguishes_funded() -> () {
        let funded = phase_body("Hello", 2, true);
        let in_progress = phase_body("Hello", 1, false);

        assert_eq!(funded.contains("funded"), true);
        assert_eq!(in_progress.contains("completed phase 1"), true);
    }
}
