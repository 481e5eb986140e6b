use chrono::{DateTime, Utc};
use extractor::VaultEvent;
use primitives::format_units;

/// Decimal places of the vault's USDT balances.
const USDT_DECIMALS: u8 = 6;

/// One renderable, deliverable notification. Derived from a single event,
/// consumed by exactly one send attempt, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationJob {
    /// Recipient email address, as supplied by the contract state.
    pub to: String,
    /// Message subject line.
    pub subject: String,
    /// Plain-text message body.
    pub body: String,
}

/// Map an event to its notification template and recipient.
///
/// Pure: one arm per event kind, no I/O. The match is exhaustive, so adding
/// an event kind to the fetch layer without a route here is a compile error.
/// `executed_at` stamps the distribution notice with the time the event was
/// observed.
pub fn route(event: &VaultEvent, executed_at: DateTime<Utc>) -> NotificationJob {
    match event {
        VaultEvent::Warning(w) => NotificationJob {
            to: w.email.clone(),
            subject: format!("[Warning] Please confirm {} is safe", w.name),
            body: format!(
                "{} has missed their scheduled safety check-ins and crossed the \
                 warning threshold. Please try to contact them right away and \
                 confirm they are safe.",
                w.name
            ),
        },
        VaultEvent::Distributed(d) => NotificationJob {
            to: d.userEmail.clone(),
            subject: format!(
                "[Notice] The digital asset distribution plan of {} has been executed",
                d.userName
            ),
            body: format!(
                "Dear user or family member,\n\n\
                 The holder of address {} ({}) has exceeded the distribution \
                 threshold without a safety check-in. Per the instructions \
                 previously recorded in the smart contract, the digital asset \
                 distribution plan was executed at {}.",
                d.userAddress,
                d.userName,
                executed_at.format("%Y-%m-%d %H:%M:%S UTC"),
            ),
        },
        VaultEvent::HeirPayout(p) => NotificationJob {
            to: p.heirEmail.clone(),
            subject: format!("[Asset Received] A digital inheritance from {}", p.fromName),
            body: format!(
                "Dear beneficiary,\n\n\
                 {} previously designated you as a beneficiary in their digital \
                 inheritance plan.\n\n\
                 Amount received: {} USDT\n\
                 Recipient wallet: {}\n\n\
                 These assets carry {}'s trust in you. Please check your wallet. \
                 Nobody legitimate will ever ask you for fees or private keys to \
                 release these funds; treat any such request as fraud.",
                p.fromName,
                format_units(p.amount, USDT_DECIMALS),
                p.toHeir,
                p.fromName,
            ),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, U256};
    use chainio::ILifeVault::{HeirNotification, InheritanceDistributed, WarningTriggered};

    fn now() -> DateTime<Utc> {
        "2024-06-01T10:00:00Z".parse().unwrap()
    }

    #[test]
    fn warning_goes_to_emergency_contact() {
        let event = VaultEvent::Warning(WarningTriggered {
            userAddress: Address::ZERO,
            name: "Ann".into(),
            email: "user@example.com".into(),
        });
        let job = route(&event, now());
        assert_eq!(job.to, "user@example.com");
        assert!(job.subject.contains("Warning"));
        assert!(job.body.contains("Ann"));
    }

    #[test]
    fn distribution_goes_to_the_users_own_email() {
        let user = Address::repeat_byte(7);
        let event = VaultEvent::Distributed(InheritanceDistributed {
            userAddress: user,
            userName: "Ann".into(),
            userEmail: "ann@example.com".into(),
        });
        let job = route(&event, now());
        assert_eq!(job.to, "ann@example.com");
        assert!(job.body.contains(&user.to_string()));
        assert!(job.body.contains("2024-06-01 10:00:00 UTC"));
    }

    #[test]
    fn heir_payout_scales_amount_by_six_decimals() {
        let event = VaultEvent::HeirPayout(HeirNotification {
            fromUser: Address::ZERO,
            fromName: "Ann".into(),
            toHeir: Address::repeat_byte(1),
            heirEmail: "heir@example.com".into(),
            amount: U256::from(1_500_000u64),
        });
        let job = route(&event, now());
        assert_eq!(job.to, "heir@example.com");
        assert!(job.body.contains("1.5 USDT"));
        assert!(job.body.contains("fraud"));
    }
}
