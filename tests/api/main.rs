mod contact;
mod helpers;
