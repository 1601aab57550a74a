pub mod u001_process_prompt;
