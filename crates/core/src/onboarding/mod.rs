//! Onboarding module - one-shot application of the setup wizard's payload.

mod onboarding_model;
mod onboarding_service;

#[cfg(test)]
mod onboarding_service_tests;

pub use onboarding_model::{
    predefined_goal_name, CustomGoal, NamedAmount, OnboardingExpenses, OnboardingGoals,
    OnboardingIncome, OnboardingIncomeType, OnboardingSubmission, PredefinedGoal,
};
pub use onboarding_service::{OnboardingService, OnboardingServiceTrait};
