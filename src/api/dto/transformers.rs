//! DTO transformation functions.
//!
//! Pure functions converting domain values and workflow results into
//! response DTOs, and request DTOs into workflow inputs.

use crate::api::dto::requests::CreateTaskRequest;
use crate::api::dto::responses::{
    ClaimResponse, ClosedTaskResponse, LoginResponse, ReferralResponse, SettledDepositResponse,
    TaskResponse, TaskTypeResponse, UserResponse, WalletTransactionResponse,
};
use crate::application::{ClaimReceipt, ClosedTask, CreateTaskInput, LoginOutcome, SettledDeposit};
use crate::domain::{ReferredUser, Task, TaskType, TaskTypeId, User, WalletTransaction};

/// Converts a user to its response DTO.
#[must_use]
pub fn user_to_response(user: &User) -> UserResponse {
    UserResponse {
        id: user.id.value(),
        external_id: user.external_id.value(),
        username: user.profile.username.clone(),
        first_name: user.profile.first_name.clone(),
        last_name: user.profile.last_name.clone(),
        language_code: user.profile.language_code.clone(),
        is_premium: user.profile.is_premium,
        points: user.points.value(),
        referral_code: user.referral_code.as_str().to_string(),
        referred_by: user.referred_by.map(|referrer| referrer.value()),
        created_at: user.created_at,
    }
}

/// Converts a login outcome to its response DTO.
#[must_use]
pub fn login_to_response(outcome: &LoginOutcome) -> LoginResponse {
    LoginResponse {
        status: "success",
        created: outcome.created,
        user: user_to_response(&outcome.user),
    }
}

/// Converts a task to its response DTO.
#[must_use]
pub fn task_to_response(task: &Task) -> TaskResponse {
    TaskResponse {
        id: task.id.value(),
        owner_id: task.owner.value(),
        task_type_id: task.task_type.value(),
        name: task.name.clone(),
        description: task.description.clone(),
        link: task.link.clone(),
        total_clicks: task.total_clicks,
        completed_clicks: task.completed_clicks,
        remaining_clicks: task.remaining_clicks(),
        reward_per_click: task.reward_per_click.value(),
        reserved_points: task.reserved_points.value(),
        status: task.status.as_str(),
        created_at: task.created_at,
        updated_at: task.updated_at,
    }
}

/// Converts a list of tasks to response DTOs.
#[must_use]
pub fn tasks_to_response(tasks: &[Task]) -> Vec<TaskResponse> {
    tasks.iter().map(task_to_response).collect()
}

/// Converts a claim receipt to its response DTO.
#[must_use]
pub fn claim_to_response(receipt: &ClaimReceipt) -> ClaimResponse {
    ClaimResponse {
        task: task_to_response(&receipt.task),
        payout: receipt.payout.value(),
        balance: receipt.balance.value(),
    }
}

/// Converts a closed task to its response DTO.
#[must_use]
pub fn closed_task_to_response(closed: &ClosedTask) -> ClosedTaskResponse {
    ClosedTaskResponse {
        task: task_to_response(&closed.task),
        refund: closed.refund.value(),
    }
}

/// Converts a task type to its response DTO.
#[must_use]
pub fn task_type_to_response(task_type: &TaskType) -> TaskTypeResponse {
    TaskTypeResponse {
        id: task_type.id.value(),
        name: task_type.name.clone(),
    }
}

/// Converts a referred user to its response DTO.
#[must_use]
pub fn referral_to_response(referred: &ReferredUser) -> ReferralResponse {
    ReferralResponse {
        external_id: referred.external_id.value(),
        username: referred.username.clone(),
        first_name: referred.first_name.clone(),
        referred_at: referred.referred_at,
    }
}

/// Converts a wallet transaction to its response DTO.
#[must_use]
pub fn wallet_transaction_to_response(transaction: &WalletTransaction) -> WalletTransactionResponse {
    WalletTransactionResponse {
        id: transaction.id.value(),
        user_id: transaction.user.value(),
        wallet_address: transaction.wallet_address.clone(),
        transaction_hash: transaction.transaction_hash.clone(),
        amount: transaction.amount,
        status: transaction.status.as_str(),
        created_at: transaction.created_at,
    }
}

/// Converts a settlement to its response DTO.
#[must_use]
pub fn settlement_to_response(settled: &SettledDeposit) -> SettledDepositResponse {
    SettledDepositResponse {
        transaction: wallet_transaction_to_response(&settled.transaction),
        credited: settled.credited.value(),
    }
}

/// Converts a create-task request into the workflow input.
#[must_use]
pub fn create_task_input(request: CreateTaskRequest) -> CreateTaskInput {
    CreateTaskInput {
        task_type: TaskTypeId::new(request.task_type_id),
        name: request.name,
        description: request.description,
        link: request.link,
        total_clicks: request.total_clicks,
        reward_per_click: request.reward_per_click,
    }
}
