//! Referral code generation.

use rand::thread_rng;

use crate::application::ports::ReferralCodeGenerator;
use crate::domain::ReferralCode;

/// Draws codes uniformly from the referral alphabet using the thread RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomReferralCodeGenerator;

impl ReferralCodeGenerator for RandomReferralCodeGenerator {
    fn generate(&self) -> ReferralCode {
        ReferralCode::generate(&mut thread_rng())
    }
}
