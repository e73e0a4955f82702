//! The 16 wizard steps and their per-step lookup table

use super::operation::Operation;
use super::session::Field;

/// Number of steps, including the terminal "complete" step
pub const TOTAL_STEPS: u8 = 16;

/// How an input renders and which keys it accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    /// Rendered masked
    Secret,
    /// Digits only
    Numeric,
}

/// One input on a step's form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputSpec {
    pub field: Field,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub kind: InputKind,
}

const fn input(
    field: Field,
    label: &'static str,
    placeholder: &'static str,
    kind: InputKind,
) -> InputSpec {
    InputSpec {
        field,
        label,
        placeholder,
        kind,
    }
}

const USERNAME: InputSpec = input(
    Field::Username,
    "Username",
    "Enter your username",
    InputKind::Text,
);
const PASSWORD: InputSpec = input(
    Field::Password,
    "Password",
    "Enter your password",
    InputKind::Secret,
);
const AGE: InputSpec = input(Field::Age, "Age", "Enter your age", InputKind::Numeric);
const AUTH_KEY: InputSpec = input(
    Field::AuthKey,
    "Authentication Key",
    "Enter your auth key",
    InputKind::Text,
);
const NEW_USERNAME: InputSpec = input(
    Field::Username,
    "New Username",
    "Enter new username",
    InputKind::Text,
);
const PET_NAME: InputSpec = input(Field::PetName, "Pet Name", "Enter pet name", InputKind::Text);
const PET_TYPE: InputSpec = input(
    Field::PetType,
    "Pet Type",
    "Enter pet type (dog, cat, etc.)",
    InputKind::Text,
);
const ROLE: InputSpec = input(Field::Role, "Role", "Enter 'admin'", InputKind::Text);

/// Steps in the guided walkthrough, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WizardStep {
    CreateAccount,
    CompleteProfile,
    LoginWithoutKey,
    LoginWithKey,
    UpdateUsername,
    AddPet,
    ListOwnPets,
    ListAllPetsDenied,
    ChangeRole,
    ListAllPetsElevated,
    CountPets,
    DeletePet,
    AgeStatistics,
    CountUsers,
    Logout,
    /// Terminal step, offers "Start Over"
    Complete,
}

impl WizardStep {
    pub fn all() -> &'static [WizardStep] {
        &[
            WizardStep::CreateAccount,
            WizardStep::CompleteProfile,
            WizardStep::LoginWithoutKey,
            WizardStep::LoginWithKey,
            WizardStep::UpdateUsername,
            WizardStep::AddPet,
            WizardStep::ListOwnPets,
            WizardStep::ListAllPetsDenied,
            WizardStep::ChangeRole,
            WizardStep::ListAllPetsElevated,
            WizardStep::CountPets,
            WizardStep::DeletePet,
            WizardStep::AgeStatistics,
            WizardStep::CountUsers,
            WizardStep::Logout,
            WizardStep::Complete,
        ]
    }

    pub fn first() -> Self {
        WizardStep::CreateAccount
    }

    /// 1-based step number
    pub fn number(self) -> u8 {
        Self::all()
            .iter()
            .position(|s| *s == self)
            .map_or(1, |i| i as u8 + 1)
    }

    pub fn from_number(number: u8) -> Option<Self> {
        if number == 0 {
            return None;
        }
        Self::all().get(usize::from(number - 1)).copied()
    }

    /// Following step, saturating at the terminal step
    pub fn next(self) -> Self {
        Self::from_number(self.number() + 1).unwrap_or(WizardStep::Complete)
    }

    /// Preceding step, saturating at the first step
    pub fn prev(self) -> Self {
        Self::from_number(self.number().saturating_sub(1)).unwrap_or_else(Self::first)
    }

    pub fn is_terminal(self) -> bool {
        self == WizardStep::Complete
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::CreateAccount => "Create Account",
            WizardStep::CompleteProfile => "Complete Profile",
            WizardStep::LoginWithoutKey => "Login (Without Auth Key)",
            WizardStep::LoginWithKey => "Login (With Auth Key)",
            WizardStep::UpdateUsername => "Update Profile",
            WizardStep::AddPet => "Add a Pet",
            WizardStep::ListOwnPets => "View Your Pets",
            WizardStep::ListAllPetsDenied => "View All Pets (Unauthorized)",
            WizardStep::ChangeRole => "Become an Admin",
            WizardStep::ListAllPetsElevated => "View All Pets (Admin)",
            WizardStep::CountPets => "Get Pet Count",
            WizardStep::DeletePet => "Delete a Pet",
            WizardStep::AgeStatistics => "Get Age Statistics",
            WizardStep::CountUsers => "Get User Count",
            WizardStep::Logout => "Logout",
            WizardStep::Complete => "Congratulations!",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            WizardStep::CreateAccount => {
                "Start by creating your account with a username and password."
            }
            WizardStep::CompleteProfile => "Please provide your age to complete your profile.",
            WizardStep::LoginWithoutKey => {
                "Try logging in without the authentication key to see what happens."
            }
            WizardStep::LoginWithKey => "Now login with your authentication key to proceed.",
            WizardStep::UpdateUsername => "Change your username to something new.",
            WizardStep::AddPet => "Add a pet to your account.",
            WizardStep::ListOwnPets => "View all pets associated with your account.",
            WizardStep::ListAllPetsDenied => "Try to view all pets without admin privileges.",
            WizardStep::ChangeRole => "Change your role to admin to gain additional privileges.",
            WizardStep::ListAllPetsElevated => "Now view all pets with your admin privileges.",
            WizardStep::CountPets => "Retrieve the total count of pets in the system.",
            WizardStep::DeletePet => "Delete the pet you previously added.",
            WizardStep::AgeStatistics => "View statistics about user ages.",
            WizardStep::CountUsers => "View the total number of users in the system.",
            WizardStep::Logout => "Log out from your account.",
            WizardStep::Complete => "You've successfully completed all 16 tasks.",
        }
    }

    /// Label of the step's single actionable control
    pub fn action_label(self) -> &'static str {
        match self {
            WizardStep::CreateAccount => "Sign Up",
            WizardStep::CompleteProfile => "Submit Age",
            WizardStep::LoginWithoutKey => "Login Without AuthKey",
            WizardStep::LoginWithKey => "Login With AuthKey",
            WizardStep::UpdateUsername => "Update Username",
            WizardStep::AddPet => "Add Pet",
            WizardStep::ListOwnPets => "View My Pets",
            WizardStep::ListAllPetsDenied => "Try to View All Pets (Unauthorized)",
            WizardStep::ChangeRole => "Change Role to Admin",
            WizardStep::ListAllPetsElevated => "View All Pets as Admin",
            WizardStep::CountPets => "Get Pet Count",
            WizardStep::DeletePet => "Delete Pet",
            WizardStep::AgeStatistics => "Get Age Statistics",
            WizardStep::CountUsers => "Get User Count",
            WizardStep::Logout => "Logout",
            WizardStep::Complete => "Start Over",
        }
    }

    /// Inputs on this step's form, in focus order (empty for button-only steps)
    pub fn inputs(self) -> &'static [InputSpec] {
        match self {
            WizardStep::CreateAccount => &[USERNAME, PASSWORD],
            WizardStep::CompleteProfile => &[AGE],
            WizardStep::LoginWithoutKey => &[USERNAME, PASSWORD, AGE],
            WizardStep::LoginWithKey => &[USERNAME, PASSWORD, AGE, AUTH_KEY],
            WizardStep::UpdateUsername => &[NEW_USERNAME],
            WizardStep::AddPet => &[PET_NAME, PET_TYPE],
            WizardStep::ChangeRole => &[ROLE],
            _ => &[],
        }
    }

    /// The remote operation this step performs, `None` for the terminal step
    pub fn operation(self) -> Option<Operation> {
        match self {
            WizardStep::CreateAccount => Some(Operation::CreateAccount),
            WizardStep::CompleteProfile => Some(Operation::CompleteProfile),
            WizardStep::LoginWithoutKey => Some(Operation::LoginWithoutKey),
            WizardStep::LoginWithKey => Some(Operation::LoginWithKey),
            WizardStep::UpdateUsername => Some(Operation::UpdateUsername),
            WizardStep::AddPet => Some(Operation::AddPet),
            WizardStep::ListOwnPets => Some(Operation::ListOwnPets),
            WizardStep::ListAllPetsDenied => Some(Operation::ListAllPets),
            WizardStep::ChangeRole => Some(Operation::ChangeRole),
            WizardStep::ListAllPetsElevated => Some(Operation::ListAllPetsElevated),
            WizardStep::CountPets => Some(Operation::CountPets),
            WizardStep::DeletePet => Some(Operation::DeletePet),
            WizardStep::AgeStatistics => Some(Operation::AgeStatistics),
            WizardStep::CountUsers => Some(Operation::CountUsers),
            WizardStep::Logout => Some(Operation::Logout),
            WizardStep::Complete => None,
        }
    }
}
